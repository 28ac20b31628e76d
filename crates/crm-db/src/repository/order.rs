//! # Order Repository
//!
//! Database operations for orders. Order creation is transactional: the order
//! row, its product join rows, and the snapshot total all commit together or
//! not at all, so a stored order always carries the prices that were current
//! when it was placed.
//!
//! ## Relation-Traversal Filters
//! `customer_name` joins through customers; `product_name` joins through the
//! order_products many-to-many table. The product join can match one order
//! several times, so both the page query and the count use DISTINCT.

use chrono::{DateTime, Utc};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use tracing::debug;

use crate::error::DbResult;
use crate::repository::generate_id;
use crm_core::{Connection, Order, OrderFilter, OrderProduct, Page, Product};

/// Repository for order database operations.
#[derive(Debug, Clone)]
pub struct OrderRepository {
    pool: SqlitePool,
}

impl OrderRepository {
    /// Creates a new OrderRepository.
    pub fn new(pool: SqlitePool) -> Self {
        OrderRepository { pool }
    }

    /// Creates an order for `customer_id` over the given resolved products.
    ///
    /// Runs in a single transaction: order row, one join row per product with
    /// the price snapshotted, then the total written back onto the order.
    ///
    /// The caller has already resolved the products, so `products` is the
    /// definitive line-item set; an empty slice is rejected upstream.
    pub async fn create_with_products(
        &self,
        customer_id: &str,
        products: &[Product],
    ) -> DbResult<Order> {
        let id = generate_id();
        let order_date = Utc::now();
        let total_cents: i64 = products.iter().map(|p| p.price_cents).sum();

        debug!(
            order_id = %id,
            customer_id = %customer_id,
            products = products.len(),
            total_cents,
            "Creating order"
        );

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO orders (id, customer_id, order_date, total_amount_cents)
            VALUES (?1, ?2, ?3, NULL)
            "#,
        )
        .bind(&id)
        .bind(customer_id)
        .bind(order_date)
        .execute(&mut *tx)
        .await?;

        for product in products {
            sqlx::query(
                r#"
                INSERT INTO order_products (order_id, product_id, price_cents_snapshot)
                VALUES (?1, ?2, ?3)
                "#,
            )
            .bind(&id)
            .bind(&product.id)
            .bind(product.price_cents)
            .execute(&mut *tx)
            .await?;
        }

        sqlx::query("UPDATE orders SET total_amount_cents = ?1 WHERE id = ?2")
            .bind(total_cents)
            .bind(&id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(Order {
            id,
            customer_id: customer_id.to_string(),
            order_date,
            total_amount_cents: Some(total_cents),
        })
    }

    /// Gets an order by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Order>> {
        let order = sqlx::query_as::<_, Order>(
            "SELECT id, customer_id, order_date, total_amount_cents FROM orders WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(order)
    }

    /// Gets the join rows (with price snapshots) for one order, ordered by
    /// product ID.
    pub async fn line_items(&self, order_id: &str) -> DbResult<Vec<OrderProduct>> {
        let items = sqlx::query_as::<_, OrderProduct>(
            r#"
            SELECT order_id, product_id, price_cents_snapshot
            FROM order_products
            WHERE order_id = ?1
            ORDER BY product_id
            "#,
        )
        .bind(order_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    /// Lists orders matching the filter as a paginated connection.
    pub async fn list(&self, filter: &OrderFilter, page: &Page) -> DbResult<Connection<Order>> {
        debug!(?filter, ?page, "Listing orders");

        let mut count_query: QueryBuilder<Sqlite> =
            QueryBuilder::new("SELECT COUNT(DISTINCT o.id) FROM orders o");
        push_joins(&mut count_query, filter);
        count_query.push(" WHERE 1=1");
        push_filters(&mut count_query, filter);
        let total_count: i64 = count_query
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await?;

        let mut select_query: QueryBuilder<Sqlite> = QueryBuilder::new(
            "SELECT DISTINCT o.id, o.customer_id, o.order_date, o.total_amount_cents FROM orders o",
        );
        push_joins(&mut select_query, filter);
        select_query.push(" WHERE 1=1");
        push_filters(&mut select_query, filter);
        select_query.push(" ORDER BY o.id LIMIT ");
        select_query.push_bind(page.clamped_limit() as i64);
        select_query.push(" OFFSET ");
        select_query.push_bind(page.offset as i64);

        let items: Vec<Order> = select_query
            .build_query_as()
            .fetch_all(&self.pool)
            .await?;

        Ok(Connection::from_page(items, total_count, page))
    }

    /// Returns (order id, order date, customer email) for every order placed
    /// at or after `cutoff`, ordered by order ID.
    ///
    /// Feeds the reminder job, which needs the recipient address alongside
    /// each recent order.
    pub async fn list_since_with_customer(
        &self,
        cutoff: DateTime<Utc>,
    ) -> DbResult<Vec<(String, DateTime<Utc>, String)>> {
        let rows = sqlx::query_as::<_, (String, DateTime<Utc>, String)>(
            r#"
            SELECT o.id, o.order_date, c.email
            FROM orders o
            JOIN customers c ON c.id = o.customer_id
            WHERE o.order_date >= ?1
            ORDER BY o.id
            "#,
        )
        .bind(cutoff)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Counts all orders.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM orders")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

/// Appends the joins needed by relation-traversal filters.
fn push_joins(qb: &mut QueryBuilder<Sqlite>, filter: &OrderFilter) {
    if filter.customer_name.is_some() {
        qb.push(" JOIN customers c ON c.id = o.customer_id");
    }
    if filter.product_name.is_some() {
        qb.push(" JOIN order_products op ON op.order_id = o.id");
        qb.push(" JOIN products p ON p.id = op.product_id");
    }
}

/// Appends the order filter predicates to a query.
fn push_filters(qb: &mut QueryBuilder<Sqlite>, filter: &OrderFilter) {
    if let Some(cents) = filter.total_amount_cents_gte {
        qb.push(" AND o.total_amount_cents >= ");
        qb.push_bind(cents);
    }
    if let Some(cents) = filter.total_amount_cents_lte {
        qb.push(" AND o.total_amount_cents <= ");
        qb.push_bind(cents);
    }
    if let Some(ts) = filter.order_date_gte {
        qb.push(" AND o.order_date >= ");
        qb.push_bind(ts);
    }
    if let Some(ts) = filter.order_date_lte {
        qb.push(" AND o.order_date <= ");
        qb.push_bind(ts);
    }
    if let Some(name) = &filter.customer_name {
        qb.push(" AND instr(lower(c.name), lower(");
        qb.push_bind(name.clone());
        qb.push(")) > 0");
    }
    if let Some(name) = &filter.product_name {
        qb.push(" AND instr(lower(p.name), lower(");
        qb.push_bind(name.clone());
        qb.push(")) > 0");
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
