//! # Query Operations
//!
//! Read-side engine surface: paginated connections over each entity plus the
//! recent-orders lookup the reminder job runs. All composition rules live in
//! the repository layer; this module is a thin boundary that keeps callers
//! off the raw repositories.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::EngineResult;
use crate::Engine;
use crm_core::{
    Connection, Customer, CustomerFilter, Order, OrderFilter, Page, Product, ProductFilter,
};

/// A recent order paired with the email it should be sent to.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderReminder {
    pub order_id: String,
    pub order_date: DateTime<Utc>,
    pub customer_email: String,
}

impl Engine {
    /// Lists customers matching the filter.
    pub async fn all_customers(
        &self,
        filter: &CustomerFilter,
        page: &Page,
    ) -> EngineResult<Connection<Customer>> {
        Ok(self.db().customers().list(filter, page).await?)
    }

    /// Lists products matching the filter.
    pub async fn all_products(
        &self,
        filter: &ProductFilter,
        page: &Page,
    ) -> EngineResult<Connection<Product>> {
        Ok(self.db().products().list(filter, page).await?)
    }

    /// Lists orders matching the filter.
    pub async fn all_orders(
        &self,
        filter: &OrderFilter,
        page: &Page,
    ) -> EngineResult<Connection<Order>> {
        Ok(self.db().orders().list(filter, page).await?)
    }

    /// Returns a reminder entry for every order placed at or after `cutoff`.
    pub async fn orders_since(&self, cutoff: DateTime<Utc>) -> EngineResult<Vec<OrderReminder>> {
        let rows = self.db().orders().list_since_with_customer(cutoff).await?;
        Ok(rows
            .into_iter()
            .map(|(order_id, order_date, customer_email)| OrderReminder {
                order_id,
                order_date,
                customer_email,
            })
            .collect())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
