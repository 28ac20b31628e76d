//! # crm-cron
//!
//! Long-running job runner for the CRM engine. Opens the shared SQLite
//! database, builds one [`Engine`], and drives the four maintenance jobs
//! (heartbeat, restock, reminders, report) on their configured intervals
//! until SIGINT/SIGTERM.

mod config;
mod jobs;
mod logfile;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::config::CronConfig;
use crate::jobs::heartbeat::HeartbeatJob;
use crate::jobs::reminders::RemindersJob;
use crate::jobs::report::ReportJob;
use crate::jobs::restock::RestockJob;
use crate::jobs::run_on_interval;
use crm_db::{Database, DbConfig};
use crm_engine::Engine;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    if let Err(err) = run().await {
        error!(%err, "crm-cron failed");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = CronConfig::load()?;
    info!(db = %config.database_path.display(), "Starting crm-cron");

    let db = Database::new(DbConfig::new(&config.database_path)).await?;
    let engine = Engine::new(db);

    let heartbeat = tokio::spawn(run_on_interval(
        HeartbeatJob::new(engine.clone(), config.heartbeat_log.clone()),
        config.heartbeat_interval,
    ));
    let restock = tokio::spawn(run_on_interval(
        RestockJob::new(engine.clone(), config.restock_log.clone()),
        config.restock_interval,
    ));
    let reminders = tokio::spawn(run_on_interval(
        RemindersJob::new(engine.clone(), config.reminders_log.clone()),
        config.reminders_interval,
    ));
    let report = tokio::spawn(run_on_interval(
        ReportJob::new(engine.clone(), config.report_log.clone()),
        config.report_interval,
    ));

    shutdown_signal().await;
    info!("Shutdown signal received; stopping jobs");

    heartbeat.abort();
    restock.abort();
    reminders.abort();
    report.abort();

    engine.db().close().await;
    info!("crm-cron stopped");
    Ok(())
}

/// Resolves on SIGINT (Ctrl+C) or, on unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            error!(%err, "Failed to install Ctrl+C handler");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => error!(%err, "Failed to install SIGTERM handler"),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
