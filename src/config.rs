use std::path::Path;
use std::time::Duration;

use config::{Config, ConfigError, Environment, File};
use recurrence::{CommitMode, SystemClock};
use serde::Deserialize;
use thiserror::Error;

pub const DEFAULT_DATABASE_URL: &str = "sqlite://fintrack.db?mode=rwc";
pub const DEFAULT_CONFIG_FILE: &str = "fintrack";
const ENV_PREFIX: &str = "FINTRACK";

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("UTC offset of {0} minutes is out of range")]
    InvalidUtcOffset(i32),

    #[error("Scheduler interval must be at least one second")]
    InvalidInterval,
}

/// Runtime settings.
///
/// Layered, lowest priority first: built-in defaults, an optional config file
/// (`fintrack.toml` unless `--config` says otherwise), `FINTRACK_*`
/// environment variables. A `--database-url` given on the command line wins
/// over all of them.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Settings {
    pub database_url: String,
    pub scheduler_interval_secs: u64,
    /// Fixed offset from UTC, in minutes, that decides which calendar day is
    /// "today". This is an offset, not a named time zone: daylight saving
    /// changes are not followed and the value must be updated by hand when
    /// the local offset changes. Defaults to -180 (UTC-3, São Paulo).
    pub utc_offset_minutes: i32,
    pub commit_mode: CommitMode,
}

impl Settings {
    pub fn load(config_file: Option<&Path>) -> Result<Self, SettingsError> {
        Self::layered(config_file, Environment::with_prefix(ENV_PREFIX))
    }

    fn layered(config_file: Option<&Path>, environment: Environment) -> Result<Self, SettingsError> {
        let file = match config_file {
            Some(path) => File::from(path).required(true),
            None => File::with_name(DEFAULT_CONFIG_FILE).required(false),
        };

        let settings: Settings = Config::builder()
            .set_default("database_url", DEFAULT_DATABASE_URL)?
            .set_default("scheduler_interval_secs", 1800)?
            .set_default("utc_offset_minutes", -180)?
            .set_default("commit_mode", "per-template")?
            .add_source(file)
            .add_source(environment.try_parsing(true))
            .build()?
            .try_deserialize()?;

        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<(), SettingsError> {
        if self.scheduler_interval_secs == 0 {
            return Err(SettingsError::InvalidInterval);
        }
        self.clock()?;
        Ok(())
    }

    pub fn with_database_url(mut self, database_url: Option<String>) -> Self {
        if let Some(url) = database_url {
            self.database_url = url;
        }
        self
    }

    pub fn scheduler_interval(&self) -> Duration {
        Duration::from_secs(self.scheduler_interval_secs)
    }

    pub fn clock(&self) -> Result<SystemClock, SettingsError> {
        SystemClock::with_offset_minutes(self.utc_offset_minutes)
            .ok_or(SettingsError::InvalidUtcOffset(self.utc_offset_minutes))
    }
}
