//! # crm-core: Pure Business Logic for the CRM Engine
//!
//! This crate is the heart of the CRM engine. It contains all business logic
//! as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//!   Scheduled jobs (apps/cron)
//!        │
//!        ▼
//!   crm-engine          Mutation orchestrator + query surface
//!        │
//!        ▼
//!   ★ crm-core ★        types · money · validation · filter · report
//!        │               NO I/O - NO DATABASE - PURE FUNCTIONS
//!        ▼
//!   crm-db              SQLite repositories, migrations, filter SQL
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Customer, Product, Order) and input DTOs
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`error`] - Validation error taxonomy
//! - [`validation`] - Field-level and per-entity rule checks
//! - [`filter`] - Composable filter parameters and paginated connections
//! - [`report`] - Pure reporting aggregation (counts, revenue)
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: same input = same output, always
//! 2. **No I/O**: database, network, file system access is FORBIDDEN here
//! 3. **Integer Money**: all monetary values are cents (i64), never floats
//! 4. **Explicit Errors**: all errors are typed, never strings or panics

pub mod error;
pub mod filter;
pub mod money;
pub mod report;
pub mod types;
pub mod validation;

pub use error::{ValidationError, ValidationResult};
pub use filter::{Connection, CustomerFilter, OrderFilter, Page, ProductFilter};
pub use money::Money;
pub use report::CrmReport;
pub use types::*;
pub use validation::{validate_customer, validate_product};

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Stock level below which a product is considered "low stock".
///
/// The restock job finds every product under this threshold and tops it up.
pub const LOW_STOCK_THRESHOLD: i64 = 10;

/// How many units the restock mutation adds to each low-stock product.
pub const RESTOCK_INCREMENT: i64 = 10;

/// Default page size for query connections.
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Maximum page size a caller can request; larger values are clamped.
pub const MAX_PAGE_SIZE: u32 = 100;
