//! # Product Repository
//!
//! Database operations for products: inserts, bulk lookups for order
//! resolution, the filtered `allProducts` connection, and the stock
//! maintenance queries used by the restock job.

use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use tracing::debug;

use crate::error::{DbError, DbResult};
use crm_core::{Connection, Page, Product, ProductFilter};

/// Repository for product database operations.
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Inserts a new product.
    pub async fn insert(&self, product: &Product) -> DbResult<()> {
        debug!(id = %product.id, name = %product.name, "Inserting product");

        sqlx::query(
            r#"
            INSERT INTO products (id, name, price_cents, stock, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(&product.id)
        .bind(&product.name)
        .bind(product.price_cents)
        .bind(product.stock)
        .bind(product.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Gets a product by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(
            "SELECT id, name, price_cents, stock, created_at FROM products WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// Gets every product whose ID appears in `ids`, ordered by ID.
    ///
    /// IDs with no matching row are simply absent from the result; the caller
    /// decides whether missing references are tolerable.
    pub async fn get_many(&self, ids: &[String]) -> DbResult<Vec<Product>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new(
            "SELECT id, name, price_cents, stock, created_at FROM products WHERE id IN (",
        );
        let mut separated = qb.separated(", ");
        for id in ids {
            separated.push_bind(id.clone());
        }
        qb.push(") ORDER BY id");

        let products: Vec<Product> = qb.build_query_as().fetch_all(&self.pool).await?;
        Ok(products)
    }

    /// Lists products matching the filter as a paginated connection.
    pub async fn list(
        &self,
        filter: &ProductFilter,
        page: &Page,
    ) -> DbResult<Connection<Product>> {
        debug!(?filter, ?page, "Listing products");

        let mut count_query: QueryBuilder<Sqlite> =
            QueryBuilder::new("SELECT COUNT(*) FROM products WHERE 1=1");
        push_filters(&mut count_query, filter);
        let total_count: i64 = count_query
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await?;

        let mut select_query: QueryBuilder<Sqlite> = QueryBuilder::new(
            "SELECT id, name, price_cents, stock, created_at FROM products WHERE 1=1",
        );
        push_filters(&mut select_query, filter);
        select_query.push(" ORDER BY id LIMIT ");
        select_query.push_bind(page.clamped_limit() as i64);
        select_query.push(" OFFSET ");
        select_query.push_bind(page.offset as i64);

        let items: Vec<Product> = select_query
            .build_query_as()
            .fetch_all(&self.pool)
            .await?;

        Ok(Connection::from_page(items, total_count, page))
    }

    /// Returns every product with stock strictly below `threshold`.
    pub async fn low_stock(&self, threshold: i64) -> DbResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, price_cents, stock, created_at
            FROM products
            WHERE stock < ?1
            ORDER BY id
            "#,
        )
        .bind(threshold)
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    /// Adds `delta` to a product's stock and returns the updated row.
    pub async fn add_stock(&self, id: &str, delta: i64) -> DbResult<Product> {
        let result = sqlx::query("UPDATE products SET stock = stock + ?1 WHERE id = ?2")
            .bind(delta)
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("product", id));
        }

        self.get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("product", id))
    }
}

/// Appends the product filter predicates to a query.
fn push_filters(qb: &mut QueryBuilder<Sqlite>, filter: &ProductFilter) {
    if let Some(name) = &filter.name {
        qb.push(" AND instr(lower(name), lower(");
        qb.push_bind(name.clone());
        qb.push(")) > 0");
    }
    if let Some(cents) = filter.price_cents_gte {
        qb.push(" AND price_cents >= ");
        qb.push_bind(cents);
    }
    if let Some(cents) = filter.price_cents_lte {
        qb.push(" AND price_cents <= ");
        qb.push_bind(cents);
    }
    if let Some(stock) = filter.stock_gte {
        qb.push(" AND stock >= ");
        qb.push_bind(stock);
    }
    if let Some(stock) = filter.stock_lte {
        qb.push(" AND stock <= ");
        qb.push_bind(stock);
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use chrono::Utc;
    use crm_core::LOW_STOCK_THRESHOLD;

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    fn product(id: &str, name: &str, price_cents: i64, stock: i64) -> Product {
        Product {
            id: id.to_string(),
            name: name.to_string(),
            price_cents,
            stock,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let db = test_db().await;
        let repo = db.products();

        repo.insert(&product("p1", "Widget", 1099, 50)).await.unwrap();

        let fetched = repo.get_by_id("p1").await.unwrap().unwrap();
        assert_eq!(fetched.name, "Widget");
        assert_eq!(fetched.price_cents, 1099);
        assert_eq!(fetched.stock, 50);
    }

    #[tokio::test]
    async fn test_get_many_skips_missing_ids() {
        let db = test_db().await;
        let repo = db.products();

        repo.insert(&product("p1", "Widget", 100, 5)).await.unwrap();
        repo.insert(&product("p2", "Gadget", 200, 5)).await.unwrap();

        let found = repo
            .get_many(&[
                "p1".to_string(),
                "missing".to_string(),
                "p2".to_string(),
            ])
            .await
            .unwrap();
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].id, "p1");
        assert_eq!(found[1].id, "p2");

        assert!(repo.get_many(&[]).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_with_range_filters() {
        let db = test_db().await;
        let repo = db.products();

        repo.insert(&product("p1", "Cheap", 100, 3)).await.unwrap();
        repo.insert(&product("p2", "Mid", 500, 10)).await.unwrap();
        repo.insert(&product("p3", "Dear", 2000, 30)).await.unwrap();

        let conn = repo
            .list(
                &ProductFilter::default().price_cents_gte(200).stock_lte(15),
                &Page::default(),
            )
            .await
            .unwrap();
        assert_eq!(conn.len(), 1);
        assert_eq!(conn.items[0].id, "p2");
    }

    #[tokio::test]
    async fn test_low_stock_threshold_is_exclusive() {
        let db = test_db().await;
        let repo = db.products();

        repo.insert(&product("p1", "Low", 100, 3)).await.unwrap();
        repo.insert(&product("p2", "Boundary", 100, LOW_STOCK_THRESHOLD))
            .await
            .unwrap();
        repo.insert(&product("p3", "High", 100, 40)).await.unwrap();

        let low = repo.low_stock(LOW_STOCK_THRESHOLD).await.unwrap();
        assert_eq!(low.len(), 1);
        assert_eq!(low[0].id, "p1");
    }

    #[tokio::test]
    async fn test_add_stock() {
        let db = test_db().await;
        let repo = db.products();

        repo.insert(&product("p1", "Widget", 100, 3)).await.unwrap();

        let updated = repo.add_stock("p1", 10).await.unwrap();
        assert_eq!(updated.stock, 13);

        let err = repo.add_stock("missing", 10).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }
}
