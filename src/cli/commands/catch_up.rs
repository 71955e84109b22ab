use anyhow::Result;
use chrono::NaiveDate;
use recurrence::{CatchUpEngine, CatchUpReport, Clock};
use sea_orm::DatabaseConnection;
use tracing::{debug, info};

use super::initdb::connect;
use crate::config::Settings;

/// One catch-up run against the configured database, then exit.
pub async fn catch_up(settings: &Settings, today: Option<NaiveDate>, json: bool) -> Result<()> {
    let today = match today {
        Some(day) => {
            info!(%day, "Catching up to an explicit day");
            day
        }
        None => settings.clock()?.today(),
    };

    let db = connect(&settings.database_url).await?;
    let engine = CatchUpEngine::new(settings.commit_mode);
    let report = run_catch_up(&db, &engine, today).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", summary(&report));
    }
    Ok(())
}

pub async fn run_catch_up(
    db: &DatabaseConnection,
    engine: &CatchUpEngine,
    today: NaiveDate,
) -> Result<CatchUpReport> {
    debug!(%today, commit_mode = %engine.commit_mode(), "Running catch-up");
    Ok(engine.catch_up(db, today).await?)
}

pub fn summary(report: &CatchUpReport) -> String {
    let mut line = format!(
        "Created {} occurrence(s) from {} of {} template(s)",
        report.occurrences_created, report.templates_advanced, report.templates_scanned
    );
    if report.inert_templates > 0 {
        line.push_str(&format!(
            "; {} template(s) have no usable frequency",
            report.inert_templates
        ));
    }
    if report.conflicts + report.failures > 0 {
        line.push_str(&format!(
            "; {} conflict(s), {} failure(s) left for the next run",
            report.conflicts, report.failures
        ));
    }
    line
}
