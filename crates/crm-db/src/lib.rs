//! # crm-db: Repository Facade for the CRM Engine
//!
//! Abstracts create/fetch/filter operations against SQLite. The contract the
//! engine depends on:
//!
//! - atomic single-record writes
//! - a UNIQUE index on customer email and FK constraints on orders
//! - one transactional boundary for order creation (row + associations +
//!   snapshot total commit together or not at all)
//! - stable, deduplicated, paginated filter results
//!
//! ## Modules
//! - [`pool`] - connection pool configuration and the [`Database`] handle
//! - [`migrations`] - embedded schema migrations
//! - [`repository`] - per-entity repositories
//! - [`error`] - database error types

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};
pub use repository::customer::CustomerRepository;
pub use repository::order::OrderRepository;
pub use repository::product::ProductRepository;
