//! # Repositories
//!
//! Per-entity database operations. Each repository owns the SQL for its
//! entity, including the dynamic filter composer backing the paginated
//! query connections.

pub mod customer;
pub mod order;
pub mod product;

use uuid::Uuid;

/// Generates a new entity ID (UUID v4).
pub fn generate_id() -> String {
    Uuid::new_v4().to_string()
}
