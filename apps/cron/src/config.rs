//! # Cron Configuration
//!
//! Environment-driven configuration for the job runner. Every knob has a
//! default so the binary starts with no environment at all; set variables to
//! override.
//!
//! | Variable                      | Default                        |
//! |-------------------------------|--------------------------------|
//! | `CRM_DATABASE_PATH`           | `./crm.db`                     |
//! | `CRM_HEARTBEAT_INTERVAL_SECS` | `300` (5 min)                  |
//! | `CRM_RESTOCK_INTERVAL_SECS`   | `43200` (12 h)                 |
//! | `CRM_REMINDERS_INTERVAL_SECS` | `86400` (daily)                |
//! | `CRM_REPORT_INTERVAL_SECS`    | `604800` (weekly)              |
//! | `CRM_HEARTBEAT_LOG`           | `/tmp/crm_heartbeat_log.txt`   |
//! | `CRM_RESTOCK_LOG`             | `/tmp/low_stock_updates_log.txt` |
//! | `CRM_REMINDERS_LOG`           | `/tmp/order_reminders_log.txt` |
//! | `CRM_REPORT_LOG`              | `/tmp/crm_report_log.txt`      |

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },
}

/// Runtime configuration for the job runner.
#[derive(Debug, Clone)]
pub struct CronConfig {
    /// SQLite database file path.
    pub database_path: PathBuf,
    pub heartbeat_interval: Duration,
    pub restock_interval: Duration,
    pub reminders_interval: Duration,
    pub report_interval: Duration,
    pub heartbeat_log: PathBuf,
    pub restock_log: PathBuf,
    pub reminders_log: PathBuf,
    pub report_log: PathBuf,
}

impl CronConfig {
    /// Loads configuration from environment variables, falling back to
    /// defaults.
    pub fn load() -> Result<Self, ConfigError> {
        Ok(CronConfig {
            database_path: path_env("CRM_DATABASE_PATH", "./crm.db"),
            heartbeat_interval: duration_env("CRM_HEARTBEAT_INTERVAL_SECS", 300)?,
            restock_interval: duration_env("CRM_RESTOCK_INTERVAL_SECS", 43_200)?,
            reminders_interval: duration_env("CRM_REMINDERS_INTERVAL_SECS", 86_400)?,
            report_interval: duration_env("CRM_REPORT_INTERVAL_SECS", 604_800)?,
            heartbeat_log: path_env("CRM_HEARTBEAT_LOG", "/tmp/crm_heartbeat_log.txt"),
            restock_log: path_env("CRM_RESTOCK_LOG", "/tmp/low_stock_updates_log.txt"),
            reminders_log: path_env("CRM_REMINDERS_LOG", "/tmp/order_reminders_log.txt"),
            report_log: path_env("CRM_REPORT_LOG", "/tmp/crm_report_log.txt"),
        })
    }
}

fn path_env(key: &str, default: &str) -> PathBuf {
    env::var(key).map(PathBuf::from).unwrap_or_else(|_| PathBuf::from(default))
}

fn duration_env(key: &str, default_secs: u64) -> Result<Duration, ConfigError> {
    match env::var(key) {
        Ok(raw) => raw
            .parse::<u64>()
            .map(Duration::from_secs)
            .map_err(|_| ConfigError::InvalidValue {
                key: key.to_string(),
                value: raw,
            }),
        Err(_) => Ok(Duration::from_secs(default_secs)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        // Env-free load yields the documented defaults.
        let config = CronConfig::load().unwrap();
        assert_eq!(config.heartbeat_interval, Duration::from_secs(300));
        assert_eq!(config.report_interval, Duration::from_secs(604_800));
        assert_eq!(
            config.heartbeat_log,
            PathBuf::from("/tmp/crm_heartbeat_log.txt")
        );
    }

    #[test]
    fn test_invalid_interval_rejected() {
        let result = duration_env_case("not-a-number");
        assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
    }

    fn duration_env_case(raw: &str) -> Result<Duration, ConfigError> {
        // Exercise the parse path without mutating process env.
        raw.parse::<u64>()
            .map(Duration::from_secs)
            .map_err(|_| ConfigError::InvalidValue {
                key: "CRM_HEARTBEAT_INTERVAL_SECS".to_string(),
                value: raw.to_string(),
            })
    }
}
