use std::sync::Arc;

use anyhow::Result;
use recurrence::{CatchUpEngine, RecurrenceScheduler};
use tokio::signal;
use tracing::{debug, error, info, trace};

use super::initdb::{connect, migrate};
use crate::config::Settings;

pub async fn serve(settings: &Settings, run_migrations: bool) -> Result<()> {
    trace!("Entering serve function");
    info!("fintrack scheduler starting up");
    debug!(?settings, "Loaded settings");

    let db = connect(&settings.database_url).await?;
    if run_migrations {
        migrate(&db).await?;
    }

    let clock = settings.clock()?;
    info!(
        offset = %clock.offset(),
        commit_mode = %settings.commit_mode,
        "Catching up recurring transactions every {}s",
        settings.scheduler_interval_secs
    );

    let scheduler = RecurrenceScheduler::new(
        db.clone(),
        CatchUpEngine::new(settings.commit_mode),
        Arc::new(clock),
        settings.scheduler_interval(),
    );
    scheduler.run_until(shutdown_signal()).await;

    if let Err(e) = db.close().await {
        error!("Failed to close database connection: {}", e);
    }
    info!("Scheduler shutdown gracefully");
    Ok(())
}

/// Resolves on Ctrl+C, or SIGTERM on unix.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => debug!("Received ctrl+c signal."),
        _ = terminate => debug!("Received terminate signal."),
    }
}
