//! # Customer Repository
//!
//! Database operations for customers: inserts, lookups, and the composable
//! filter query behind the `allCustomers` connection.
//!
//! ## Filter Composition
//! Every supplied predicate is ANDed onto the base query:
//! - `name` / `email`: case-insensitive substring (`instr(lower(col), ...)`)
//! - `created_at` gte/lte: inclusive range
//! - `phone_prefix`: starts-with match
//!
//! Results are ordered by primary key so pages are stable between calls.

use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use tracing::debug;

use crate::error::DbResult;
use crm_core::{Connection, Customer, CustomerFilter, Page};

/// Repository for customer database operations.
#[derive(Debug, Clone)]
pub struct CustomerRepository {
    pool: SqlitePool,
}

impl CustomerRepository {
    /// Creates a new CustomerRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CustomerRepository { pool }
    }

    /// Inserts a new customer.
    ///
    /// ## Returns
    /// * `Err(DbError::UniqueViolation)` - email already exists (the store
    ///   backstop for the engine's uniqueness pre-check)
    pub async fn insert(&self, customer: &Customer) -> DbResult<()> {
        debug!(id = %customer.id, email = %customer.email, "Inserting customer");

        sqlx::query(
            r#"
            INSERT INTO customers (id, name, email, phone, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(&customer.id)
        .bind(&customer.name)
        .bind(&customer.email)
        .bind(&customer.phone)
        .bind(customer.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Gets a customer by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Customer>> {
        let customer = sqlx::query_as::<_, Customer>(
            "SELECT id, name, email, phone, created_at FROM customers WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(customer)
    }

    /// Finds a customer by exact email (case-sensitive).
    ///
    /// Used by the engine's uniqueness check before a create.
    pub async fn find_by_email(&self, email: &str) -> DbResult<Option<Customer>> {
        let customer = sqlx::query_as::<_, Customer>(
            "SELECT id, name, email, phone, created_at FROM customers WHERE email = ?1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(customer)
    }

    /// Lists customers matching the filter as a paginated connection.
    pub async fn list(
        &self,
        filter: &CustomerFilter,
        page: &Page,
    ) -> DbResult<Connection<Customer>> {
        debug!(?filter, ?page, "Listing customers");

        let mut count_query: QueryBuilder<Sqlite> =
            QueryBuilder::new("SELECT COUNT(*) FROM customers WHERE 1=1");
        push_filters(&mut count_query, filter);
        let total_count: i64 = count_query
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await?;

        let mut select_query: QueryBuilder<Sqlite> = QueryBuilder::new(
            "SELECT id, name, email, phone, created_at FROM customers WHERE 1=1",
        );
        push_filters(&mut select_query, filter);
        select_query.push(" ORDER BY id LIMIT ");
        select_query.push_bind(page.clamped_limit() as i64);
        select_query.push(" OFFSET ");
        select_query.push_bind(page.offset as i64);

        let items: Vec<Customer> = select_query
            .build_query_as()
            .fetch_all(&self.pool)
            .await?;

        Ok(Connection::from_page(items, total_count, page))
    }
}

/// Appends the customer filter predicates to a query.
fn push_filters(qb: &mut QueryBuilder<Sqlite>, filter: &CustomerFilter) {
    if let Some(name) = &filter.name {
        qb.push(" AND instr(lower(name), lower(");
        qb.push_bind(name.clone());
        qb.push(")) > 0");
    }
    if let Some(email) = &filter.email {
        qb.push(" AND instr(lower(email), lower(");
        qb.push_bind(email.clone());
        qb.push(")) > 0");
    }
    if let Some(ts) = filter.created_at_gte {
        qb.push(" AND created_at >= ");
        qb.push_bind(ts);
    }
    if let Some(ts) = filter.created_at_lte {
        qb.push(" AND created_at <= ");
        qb.push_bind(ts);
    }
    if let Some(prefix) = &filter.phone_prefix {
        // instr(phone, ?) = 1 is a prefix match without LIKE escaping; NULL
        // phones never match.
        qb.push(" AND instr(phone, ");
        qb.push_bind(prefix.clone());
        qb.push(") = 1");
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

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    fn customer(id: &str, name: &str, email: &str, phone: Option<&str>) -> Customer {
        Customer {
            id: id.to_string(),
            name: name.to_string(),
            email: email.to_string(),
            phone: phone.map(str::to_string),
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let db = test_db().await;
        let repo = db.customers();

        let alice = customer("c1", "Alice", "alice@example.com", Some("+1 555-0100"));
        repo.insert(&alice).await.unwrap();

        let fetched = repo.get_by_id("c1").await.unwrap().unwrap();
        assert_eq!(fetched.name, "Alice");
        assert_eq!(fetched.email, "alice@example.com");
        assert_eq!(fetched.phone.as_deref(), Some("+1 555-0100"));

        assert!(repo.get_by_id("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected_by_store() {
        let db = test_db().await;
        let repo = db.customers();

        repo.insert(&customer("c1", "Alice", "alice@example.com", None))
            .await
            .unwrap();

        let err = repo
            .insert(&customer("c2", "Alicia", "alice@example.com", None))
            .await
            .unwrap_err();
        assert!(matches!(err, crate::DbError::UniqueViolation { .. }));
    }

    #[tokio::test]
    async fn test_email_uniqueness_is_case_sensitive() {
        let db = test_db().await;
        let repo = db.customers();

        repo.insert(&customer("c1", "Alice", "alice@example.com", None))
            .await
            .unwrap();
        // Different case is a different email.
        repo.insert(&customer("c2", "Alice", "Alice@example.com", None))
            .await
            .unwrap();

        assert!(repo
            .find_by_email("alice@example.com")
            .await
            .unwrap()
            .is_some());
        assert!(repo.find_by_email("ALICE@EXAMPLE.COM").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_name_substring_case_insensitive() {
        let db = test_db().await;
        let repo = db.customers();

        repo.insert(&customer("c1", "Alice Smith", "alice@example.com", None))
            .await
            .unwrap();
        repo.insert(&customer("c2", "Bob Jones", "bob@example.com", None))
            .await
            .unwrap();

        let conn = repo
            .list(&CustomerFilter::default().name("ALI"), &Page::default())
            .await
            .unwrap();
        assert_eq!(conn.len(), 1);
        assert_eq!(conn.items[0].name, "Alice Smith");
        assert_eq!(conn.total_count, 1);
    }

    #[tokio::test]
    async fn test_list_phone_prefix() {
        let db = test_db().await;
        let repo = db.customers();

        repo.insert(&customer("c1", "Alice", "alice@example.com", Some("+1 555")))
            .await
            .unwrap();
        repo.insert(&customer("c2", "Bob", "bob@example.com", Some("555")))
            .await
            .unwrap();
        repo.insert(&customer("c3", "Carol", "carol@example.com", None))
            .await
            .unwrap();

        let conn = repo
            .list(&CustomerFilter::default().phone_prefix("+1"), &Page::default())
            .await
            .unwrap();
        assert_eq!(conn.len(), 1);
        assert_eq!(conn.items[0].id, "c1");
    }

    #[tokio::test]
    async fn test_list_pagination_stable_order() {
        let db = test_db().await;
        let repo = db.customers();

        for i in 0..5 {
            repo.insert(&customer(
                &format!("c{i}"),
                &format!("Customer {i}"),
                &format!("c{i}@example.com"),
                None,
            ))
            .await
            .unwrap();
        }

        let first = repo
            .list(&CustomerFilter::default(), &Page::new(2, 0))
            .await
            .unwrap();
        assert_eq!(first.len(), 2);
        assert_eq!(first.total_count, 5);
        assert!(first.has_next_page);
        assert_eq!(first.items[0].id, "c0");

        let last = repo
            .list(&CustomerFilter::default(), &Page::new(2, 4))
            .await
            .unwrap();
        assert_eq!(last.len(), 1);
        assert!(!last.has_next_page);

        // Identical query, no intervening writes: identical result set.
        let again = repo
            .list(&CustomerFilter::default(), &Page::new(2, 0))
            .await
            .unwrap();
        let ids: Vec<_> = again.items.iter().map(|c| c.id.clone()).collect();
        assert_eq!(ids, vec!["c0", "c1"]);
    }
}
