//! # Reporting Aggregator
//!
//! Pure summary functions over already-fetched entity collections. The
//! weekly report job fetches customers and orders through the engine and
//! hands them here; no I/O happens in this module.

use serde::{Deserialize, Serialize};

use crate::money::Money;
use crate::types::{Customer, Order};

/// Summary of CRM activity: counts and total revenue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrmReport {
    pub customer_count: usize,
    pub order_count: usize,
    /// Sum of every order's snapshot total; a missing total counts as zero.
    pub total_revenue_cents: i64,
}

impl CrmReport {
    /// Returns the revenue as a Money value for display.
    #[inline]
    pub fn total_revenue(&self) -> Money {
        Money::from_cents(self.total_revenue_cents)
    }
}

/// Computes a report from fetched collections.
///
/// Deterministic: the same collections always produce the same report.
pub fn summarize(customers: &[Customer], orders: &[Order]) -> CrmReport {
    let total_revenue: Money = orders
        .iter()
        .map(|o| o.total_amount().unwrap_or_else(Money::zero))
        .sum();

    CrmReport {
        customer_count: customers.len(),
        order_count: orders.len(),
        total_revenue_cents: total_revenue.cents(),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
