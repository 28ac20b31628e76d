//! Order reminders: logs a reminder line for every order placed in the last
//! 7 days, then confirms on the console.

use std::path::PathBuf;

use chrono::{Duration, Local, Utc};
use tracing::{error, info};

use crate::jobs::Job;
use crate::logfile::append_line;
use crm_engine::Engine;

const REMINDER_WINDOW_DAYS: i64 = 7;

pub struct RemindersJob {
    engine: Engine,
    log_path: PathBuf,
}

impl RemindersJob {
    pub fn new(engine: Engine, log_path: PathBuf) -> Self {
        RemindersJob { engine, log_path }
    }
}

impl Job for RemindersJob {
    fn name(&self) -> &'static str {
        "reminders"
    }

    async fn run_once(&self) {
        let cutoff = Utc::now() - Duration::days(REMINDER_WINDOW_DAYS);
        let reminders = match self.engine.orders_since(cutoff).await {
            Ok(reminders) => reminders,
            Err(err) => {
                error!(%err, "Reminder job failed");
                return;
            }
        };

        for reminder in &reminders {
            append_line(
                &self.log_path,
                &format!(
                    "{} - Reminder for Order #{} sent to {}",
                    Local::now().to_rfc3339(),
                    reminder.order_id,
                    reminder.customer_email
                ),
            );
        }

        info!(count = reminders.len(), "Order reminders logged");
        println!("Order reminders processed!");
    }
}
