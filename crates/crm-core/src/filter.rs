//! # Filter & Pagination Types
//!
//! Composable filter parameters and the paginated connection shape shared by
//! every query operation.
//!
//! ## Composition Rules
//! All predicates supplied on one filter AND together. Substring matches are
//! case-insensitive; range bounds are inclusive (gte/lte); the phone filter
//! is a prefix match. Filters that traverse relations (order → customer,
//! order → products) are deduplicated by the repository layer so a page never
//! contains the same entity twice.
//!
//! ## Usage
//! ```rust
//! use crm_core::filter::{CustomerFilter, Page};
//!
//! let filter = CustomerFilter::default().name("ali").phone_prefix("+1");
//! let page = Page::default(); // first 20, ordered by id
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};

// =============================================================================
// Entity Filters
// =============================================================================

/// Filter predicates for customer queries.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerFilter {
    /// Case-insensitive substring match on name.
    pub name: Option<String>,
    /// Case-insensitive substring match on email.
    pub email: Option<String>,
    pub created_at_gte: Option<DateTime<Utc>>,
    pub created_at_lte: Option<DateTime<Utc>>,
    /// Phone starts-with match.
    pub phone_prefix: Option<String>,
}

impl CustomerFilter {
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn created_at_gte(mut self, ts: DateTime<Utc>) -> Self {
        self.created_at_gte = Some(ts);
        self
    }

    pub fn created_at_lte(mut self, ts: DateTime<Utc>) -> Self {
        self.created_at_lte = Some(ts);
        self
    }

    pub fn phone_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.phone_prefix = Some(prefix.into());
        self
    }
}

/// Filter predicates for product queries.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductFilter {
    /// Case-insensitive substring match on name.
    pub name: Option<String>,
    pub price_cents_gte: Option<i64>,
    pub price_cents_lte: Option<i64>,
    pub stock_gte: Option<i64>,
    pub stock_lte: Option<i64>,
}

impl ProductFilter {
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn price_cents_gte(mut self, cents: i64) -> Self {
        self.price_cents_gte = Some(cents);
        self
    }

    pub fn price_cents_lte(mut self, cents: i64) -> Self {
        self.price_cents_lte = Some(cents);
        self
    }

    pub fn stock_gte(mut self, stock: i64) -> Self {
        self.stock_gte = Some(stock);
        self
    }

    pub fn stock_lte(mut self, stock: i64) -> Self {
        self.stock_lte = Some(stock);
        self
    }
}

/// Filter predicates for order queries.
///
/// `customer_name` traverses the customer relation; `product_name` traverses
/// the many-to-many product relation and requires result deduplication, since
/// one order can match through several products.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderFilter {
    pub total_amount_cents_gte: Option<i64>,
    pub total_amount_cents_lte: Option<i64>,
    pub order_date_gte: Option<DateTime<Utc>>,
    pub order_date_lte: Option<DateTime<Utc>>,
    /// Case-insensitive substring match on the related customer's name.
    pub customer_name: Option<String>,
    /// Case-insensitive substring match on any related product's name.
    pub product_name: Option<String>,
}

impl OrderFilter {
    pub fn total_amount_cents_gte(mut self, cents: i64) -> Self {
        self.total_amount_cents_gte = Some(cents);
        self
    }

    pub fn total_amount_cents_lte(mut self, cents: i64) -> Self {
        self.total_amount_cents_lte = Some(cents);
        self
    }

    pub fn order_date_gte(mut self, ts: DateTime<Utc>) -> Self {
        self.order_date_gte = Some(ts);
        self
    }

    pub fn order_date_lte(mut self, ts: DateTime<Utc>) -> Self {
        self.order_date_lte = Some(ts);
        self
    }

    pub fn customer_name(mut self, name: impl Into<String>) -> Self {
        self.customer_name = Some(name.into());
        self
    }

    pub fn product_name(mut self, name: impl Into<String>) -> Self {
        self.product_name = Some(name.into());
        self
    }
}

// =============================================================================
// Pagination
// =============================================================================

/// Page parameters for query connections.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    /// Maximum items to return; clamped to [`MAX_PAGE_SIZE`].
    pub limit: u32,
    /// Items to skip from the start of the stable ordering.
    pub offset: u32,
}

impl Page {
    pub fn new(limit: u32, offset: u32) -> Self {
        Page { limit, offset }
    }

    /// Returns the effective limit after clamping.
    pub fn clamped_limit(&self) -> u32 {
        self.limit.min(MAX_PAGE_SIZE)
    }
}

impl Default for Page {
    fn default() -> Self {
        Page {
            limit: DEFAULT_PAGE_SIZE,
            offset: 0,
        }
    }
}

/// A paginated, filterable result set over an entity collection.
///
/// Ordering is stable (by primary key) so repeating the same query with
/// identical filters and no intervening writes returns the same result set.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection<T> {
    pub items: Vec<T>,
    /// Total matching rows regardless of pagination.
    pub total_count: i64,
    pub has_next_page: bool,
}

impl<T> Connection<T> {
    /// Builds a connection from one fetched page.
    pub fn from_page(items: Vec<T>, total_count: i64, page: &Page) -> Self {
        let has_next_page = (page.offset as i64 + items.len() as i64) < total_count;
        Connection {
            items,
            total_count,
            has_next_page,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
