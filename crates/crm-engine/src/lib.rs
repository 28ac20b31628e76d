//! # CRM Engine
//!
//! Orchestration layer over `crm-db`: validated mutations with referential
//! checks, and filterable paginated queries. One [`Engine`] wraps one
//! [`Database`] and is cheap to clone across tasks.
//!
//! ## Layering
//! - `crm-core` holds the pure pieces (types, validation, filters, report)
//! - `crm-db` owns SQL and transactions
//! - this crate decides WHAT gets written: validation order, uniqueness
//!   checks, resolution policy, commit boundaries
//!
//! ## Usage
//! ```rust,no_run
//! use crm_db::{Database, DbConfig};
//! use crm_engine::Engine;
//! use crm_core::CustomerInput;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let db = Database::new(DbConfig::new("./crm.db")).await?;
//! let engine = Engine::new(db);
//!
//! let created = engine
//!     .create_customer(CustomerInput {
//!         name: "Alice".into(),
//!         email: "alice@example.com".into(),
//!         phone: None,
//!     })
//!     .await?;
//! println!("{}", created.message);
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod mutations;
pub mod queries;

pub use error::{EngineError, EngineResult};
pub use mutations::{BulkCreateOutcome, Created, RestockOutcome};
pub use queries::OrderReminder;

use crm_db::Database;

/// The CRM mutation/query engine.
#[derive(Debug, Clone)]
pub struct Engine {
    db: Database,
}

impl Engine {
    /// Creates an engine over an initialized database.
    pub fn new(db: Database) -> Self {
        Engine { db }
    }

    /// The underlying database handle.
    pub fn db(&self) -> &Database {
        &self.db
    }
}
