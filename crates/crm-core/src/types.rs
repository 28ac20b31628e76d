//! # Domain Types
//!
//! Core domain types used throughout the CRM engine, plus the input DTOs the
//! mutation surface accepts.
//!
//! ## Type Overview
//! ```text
//!   Customer                Product                 Order
//!   ──────────              ──────────              ──────────
//!   id (UUID)               id (UUID)               id (UUID)
//!   name                    name                    customer_id (FK)
//!   email (unique)          price_cents (> 0)       order_date (frozen)
//!   phone (optional)        stock (>= 0)            total_amount_cents
//!   created_at              created_at                (snapshot, nullable)
//!
//!   OrderProduct: (order_id, product_id, price_cents_snapshot)
//! ```
//!
//! ## Storage Mapping
//! These are hand-written structs with an explicit mapping to the storage
//! representation: the `sqlx` feature adds `FromRow` derives so crm-db can
//! decode rows directly, with no reflection or schema derivation involved.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::money::Money;

// =============================================================================
// Customer
// =============================================================================

/// A customer record.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Customer {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Display name, never empty.
    pub name: String,

    /// Globally unique email; uniqueness is case-sensitive exact match.
    pub email: String,

    /// Optional phone number; only `+`, digits, dashes, and spaces allowed.
    pub phone: Option<String>,

    /// Set once at creation.
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Product
// =============================================================================

/// A product available for ordering.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Product {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Display name.
    pub name: String,

    /// Price in cents; always strictly positive.
    pub price_cents: i64,

    /// Current stock level; never negative.
    pub stock: i64,

    /// Set once at creation.
    pub created_at: DateTime<Utc>,
}

impl Product {
    /// Returns the price as a Money value.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }

    /// Whether this product counts as low stock.
    #[inline]
    pub fn is_low_stock(&self, threshold: i64) -> bool {
        self.stock < threshold
    }
}

// =============================================================================
// Order
// =============================================================================

/// An order placed by a customer.
///
/// `total_amount_cents` uses the snapshot pattern: it is computed once from
/// the referenced products' prices at creation time and never recalculated,
/// even if product prices or membership later change.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Order {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// The owning customer; always references a live Customer.
    pub customer_id: String,

    /// Set once at creation, immutable.
    pub order_date: DateTime<Utc>,

    /// Snapshot total; nullable at the storage level because it is persisted
    /// in a second step inside the creating transaction.
    pub total_amount_cents: Option<i64>,
}

impl Order {
    /// Returns the snapshot total as Money, if set.
    #[inline]
    pub fn total_amount(&self) -> Option<Money> {
        self.total_amount_cents.map(Money::from_cents)
    }
}

/// A row in the order/product association.
///
/// Carries the product's price at order time so the order total stays a
/// snapshot even when the product row changes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct OrderProduct {
    pub order_id: String,
    pub product_id: String,
    pub price_cents_snapshot: i64,
}

// =============================================================================
// Mutation Inputs
// =============================================================================

/// Input for creating a customer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerInput {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
}

/// Input for creating a product.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductInput {
    pub name: String,
    pub price_cents: i64,
    /// Defaults to zero when omitted.
    #[serde(default)]
    pub stock: Option<i64>,
}

/// Input for creating an order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderInput {
    pub customer_id: String,
    pub product_ids: Vec<String>,
}

// =============================================================================
// Unit Tests
// =============================================================================
