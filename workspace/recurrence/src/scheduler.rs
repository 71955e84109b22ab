use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use sea_orm::DatabaseConnection;
use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval};
use tracing::{debug, error, info, warn};

use crate::clock::Clock;
use crate::engine::{CatchUpEngine, CatchUpReport};
use crate::error::Result;

const MIN_INTERVAL: Duration = Duration::from_secs(1);

/// Drives the catch-up engine on a fixed interval.
///
/// The first tick fires immediately, so a freshly started process catches up
/// before waiting a full period.
#[derive(Debug, Clone)]
pub struct RecurrenceScheduler {
    db: DatabaseConnection,
    engine: CatchUpEngine,
    clock: Arc<dyn Clock>,
    interval: Duration,
}

impl RecurrenceScheduler {
    pub fn new(
        db: DatabaseConnection,
        engine: CatchUpEngine,
        clock: Arc<dyn Clock>,
        interval: Duration,
    ) -> Self {
        let interval = if interval < MIN_INTERVAL {
            warn!(
                requested = ?interval,
                "Scheduler interval too small, using {:?}",
                MIN_INTERVAL
            );
            MIN_INTERVAL
        } else {
            interval
        };

        Self {
            db,
            engine,
            clock,
            interval,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Runs one catch-up for the clock's current day.
    pub async fn tick(&self) -> Result<CatchUpReport> {
        let today = self.clock.today();
        debug!(%today, "Scheduler tick");
        self.engine.catch_up(&self.db, today).await
    }

    /// Ticks until `shutdown` resolves.
    ///
    /// A failed tick is logged and retried on the next period. Ticks missed
    /// while one was running are skipped rather than fired in a burst. A tick
    /// in progress when shutdown is requested finishes first.
    pub async fn run_until<F>(self, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        info!(interval = ?self.interval, "Starting recurrence scheduler");

        let mut ticker = interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                biased;
                _ = &mut shutdown => break,
                _ = ticker.tick() => {
                    if let Err(e) = self.tick().await {
                        error!("Recurrence tick failed: {}", e);
                    }
                }
            }
        }

        info!("Recurrence scheduler stopped");
    }

    /// Runs the scheduler on a background task.
    pub fn spawn<F>(self, shutdown: F) -> JoinHandle<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        tokio::spawn(self.run_until(shutdown))
    }
}
