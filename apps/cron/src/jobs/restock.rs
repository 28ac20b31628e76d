//! Low-stock restock: runs the restock mutation and logs one line per
//! restocked product, or a single no-op line.

use std::path::PathBuf;

use chrono::Local;
use tracing::{error, info};

use crate::jobs::Job;
use crate::logfile::append_line;
use crm_engine::Engine;

pub struct RestockJob {
    engine: Engine,
    log_path: PathBuf,
}

impl RestockJob {
    pub fn new(engine: Engine, log_path: PathBuf) -> Self {
        RestockJob { engine, log_path }
    }
}

impl Job for RestockJob {
    fn name(&self) -> &'static str {
        "restock"
    }

    async fn run_once(&self) {
        let outcome = match self.engine.update_low_stock_products().await {
            Ok(outcome) => outcome,
            Err(err) => {
                error!(%err, "Restock job failed");
                return;
            }
        };

        let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S");
        if outcome.products.is_empty() {
            append_line(
                &self.log_path,
                &format!("{timestamp} - No low stock products found"),
            );
        } else {
            for product in &outcome.products {
                append_line(
                    &self.log_path,
                    &format!(
                        "{timestamp} - Restocked {} (stock: {})",
                        product.name, product.stock
                    ),
                );
            }
        }
        info!(message = %outcome.message, "Restock pass complete");
    }
}
