//! # Scheduled Jobs
//!
//! The four maintenance jobs and the shared interval runner. Every job is a
//! client of the engine: it queries or mutates through [`crm_engine::Engine`],
//! catches every error at its own boundary, and degrades to a log line.
//! Jobs never panic and never propagate failures to the runner.

pub mod heartbeat;
pub mod reminders;
pub mod report;
pub mod restock;

use std::future::Future;
use std::time::Duration;

use tokio::time::{interval, MissedTickBehavior};
use tracing::debug;

/// A periodically executed maintenance job.
///
/// `run_once` returns a `Send` future so the runner can be `tokio::spawn`ed.
pub trait Job: Send + Sync + 'static {
    fn name(&self) -> &'static str;

    /// One pass of the job. Must handle its own errors.
    fn run_once(&self) -> impl Future<Output = ()> + Send;
}

/// Drives a job on a fixed period until the task is dropped.
///
/// The first pass runs immediately; missed ticks are delayed rather than
/// bursted so a stalled pass never causes a pile-up.
pub async fn run_on_interval<J: Job>(job: J, period: Duration) {
    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;
        debug!(job = job.name(), "Running job pass");
        job.run_once().await;
    }
}
