//! Liveness heartbeat: one `DD/MM/YYYY-HH:MM:SS CRM is alive` line per pass.

use std::path::PathBuf;

use chrono::Local;

use crate::jobs::Job;
use crate::logfile::append_line;
use crm_core::{CustomerFilter, Page};
use crm_engine::Engine;

pub struct HeartbeatJob {
    engine: Engine,
    log_path: PathBuf,
}

impl HeartbeatJob {
    pub fn new(engine: Engine, log_path: PathBuf) -> Self {
        HeartbeatJob { engine, log_path }
    }
}

impl Job for HeartbeatJob {
    fn name(&self) -> &'static str {
        "heartbeat"
    }

    async fn run_once(&self) {
        // Probe the query surface; a failing probe is tolerated silently and
        // the heartbeat still records that the process itself is alive.
        let _ = self
            .engine
            .all_customers(&CustomerFilter::default(), &Page::new(1, 0))
            .await;

        let timestamp = Local::now().format("%d/%m/%Y-%H:%M:%S");
        append_line(&self.log_path, &format!("{timestamp} CRM is alive"));
    }
}
