//! # Mutation Orchestrator
//!
//! Validated create operations for customers, products, and orders, plus the
//! stock maintenance mutation used by the restock job.
//!
//! ## Write Discipline
//! Every mutation validates before touching the store; the first validation
//! error aborts with nothing written. Order creation additionally resolves
//! its references up front, then hands the resolved set to the repository's
//! single transaction. Bulk customer creation is the one deliberate
//! exception: each item commits independently so one bad row cannot sink the
//! batch.

use serde::Serialize;
use tracing::{info, warn};

use crate::error::{EngineError, EngineResult};
use crate::Engine;
use crm_core::{
    validate_customer, validate_product, Customer, CustomerInput, Order, OrderInput, Product,
    ProductInput, ValidationError, LOW_STOCK_THRESHOLD, RESTOCK_INCREMENT,
};
use crm_db::repository::generate_id;
use crm_db::DbError;

// =============================================================================
// Response Types
// =============================================================================

/// A created entity plus its confirmation message.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Created<T> {
    pub entity: T,
    pub message: String,
}

/// Outcome of a bulk customer creation.
///
/// Successes and failures are both ordered by input position; the call itself
/// never fails because of item errors.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkCreateOutcome {
    pub customers: Vec<Customer>,
    pub errors: Vec<String>,
}

/// Outcome of a low-stock restock pass.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RestockOutcome {
    /// The restocked products with their updated stock levels.
    pub products: Vec<Product>,
    pub message: String,
}

// =============================================================================
// Mutations
// =============================================================================

impl Engine {
    /// Creates a customer after full validation.
    ///
    /// Validation order: pure field checks first, then the email uniqueness
    /// read. The first failure aborts with no write.
    pub async fn create_customer(&self, input: CustomerInput) -> EngineResult<Created<Customer>> {
        if let Some(err) = validate_customer(&input).into_iter().next() {
            return Err(err.into());
        }

        if self
            .db()
            .customers()
            .find_by_email(&input.email)
            .await?
            .is_some()
        {
            return Err(ValidationError::duplicate_key("email", &input.email).into());
        }

        let customer = Customer {
            id: generate_id(),
            name: input.name,
            email: input.email,
            phone: input.phone,
            created_at: chrono::Utc::now(),
        };

        // Unique index backstop: a concurrent create between the check above
        // and this insert surfaces here as the same validation error.
        match self.db().customers().insert(&customer).await {
            Ok(()) => {}
            Err(DbError::UniqueViolation { .. }) => {
                return Err(ValidationError::duplicate_key("email", &customer.email).into());
            }
            Err(err) => return Err(err.into()),
        }

        info!(id = %customer.id, email = %customer.email, "Customer created");
        Ok(Created {
            message: format!("Customer {} created successfully", customer.name),
            entity: customer,
        })
    }

    /// Creates many customers, tolerating per-item failures.
    ///
    /// Items are processed in input order with an independent commit boundary
    /// each; a failing item contributes an error string and the batch moves
    /// on.
    pub async fn bulk_create_customers(
        &self,
        inputs: Vec<CustomerInput>,
    ) -> EngineResult<BulkCreateOutcome> {
        let mut customers = Vec::new();
        let mut errors = Vec::new();

        for input in inputs {
            let email = input.email.clone();
            match self.create_customer(input).await {
                Ok(created) => customers.push(created.entity),
                Err(err) => {
                    warn!(email = %email, %err, "Bulk item failed");
                    errors.push(format!("{email}: {err}"));
                }
            }
        }

        info!(
            created = customers.len(),
            failed = errors.len(),
            "Bulk customer creation finished"
        );
        Ok(BulkCreateOutcome { customers, errors })
    }

    /// Creates a product after validation.
    pub async fn create_product(&self, input: ProductInput) -> EngineResult<Created<Product>> {
        if let Some(err) = validate_product(&input).into_iter().next() {
            return Err(err.into());
        }

        let product = Product {
            id: generate_id(),
            name: input.name,
            price_cents: input.price_cents,
            stock: input.stock.unwrap_or(0),
            created_at: chrono::Utc::now(),
        };
        self.db().products().insert(&product).await?;

        info!(id = %product.id, name = %product.name, "Product created");
        Ok(Created {
            message: format!("Product {} created successfully", product.name),
            entity: product,
        })
    }

    /// Creates an order for a customer over a set of product IDs.
    ///
    /// The customer must exist and at least one product ID must resolve;
    /// either failing aborts with nothing written. Product IDs that do not
    /// resolve are dropped with a warning and the order proceeds over the
    /// resolvable subset.
    pub async fn create_order(&self, input: OrderInput) -> EngineResult<Created<Order>> {
        let customer = self
            .db()
            .customers()
            .get_by_id(&input.customer_id)
            .await?
            .ok_or_else(|| EngineError::not_found("customer"))?;

        let products = self.db().products().get_many(&input.product_ids).await?;
        if products.is_empty() {
            return Err(EngineError::not_found("products"));
        }
        if products.len() < input.product_ids.len() {
            warn!(
                requested = input.product_ids.len(),
                resolved = products.len(),
                "Some product IDs did not resolve; proceeding with the subset"
            );
        }

        let order = self
            .db()
            .orders()
            .create_with_products(&customer.id, &products)
            .await?;

        info!(
            id = %order.id,
            customer_id = %order.customer_id,
            total_cents = order.total_amount_cents,
            "Order created"
        );
        Ok(Created {
            message: format!("Order created for {}", customer.name),
            entity: order,
        })
    }

    /// Restocks every product below the low-stock threshold.
    ///
    /// Each qualifying product's stock is raised by the fixed increment. The
    /// returned products carry their updated stock levels.
    pub async fn update_low_stock_products(&self) -> EngineResult<RestockOutcome> {
        let low = self.db().products().low_stock(LOW_STOCK_THRESHOLD).await?;
        if low.is_empty() {
            return Ok(RestockOutcome {
                products: Vec::new(),
                message: "No low stock products found".to_string(),
            });
        }

        let mut updated = Vec::with_capacity(low.len());
        for product in &low {
            let restocked = self
                .db()
                .products()
                .add_stock(&product.id, RESTOCK_INCREMENT)
                .await?;
            info!(
                id = %restocked.id,
                name = %restocked.name,
                stock = restocked.stock,
                "Product restocked"
            );
            updated.push(restocked);
        }

        let message = format!("Restocked {} products", updated.len());
        Ok(RestockOutcome {
            products: updated,
            message,
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crm_db::{Database, DbConfig};

    async fn test_engine() -> Engine {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        Engine::new(db)
    }

    fn customer_input(name: &str, email: &str) -> CustomerInput {
        CustomerInput {
            name: name.to_string(),
            email: email.to_string(),
            phone: None,
        }
    }

    fn product_input(name: &str, price_cents: i64, stock: i64) -> ProductInput {
        ProductInput {
            name: name.to_string(),
            price_cents,
            stock: Some(stock),
        }
    }

    #[tokio::test]
    async fn test_create_customer_success_and_duplicate() {
        let engine = test_engine().await;

        let created = engine
            .create_customer(customer_input("Alice", "alice@example.com"))
            .await
            .unwrap();
        assert_eq!(created.entity.name, "Alice");
        assert!(created.message.contains("Alice"));

        let err = engine
            .create_customer(customer_input("Alicia", "alice@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            EngineError::Validation(ValidationError::DuplicateKey { .. })
        ));
    }

    #[tokio::test]
    async fn test_create_customer_validation_aborts_before_write() {
        let engine = test_engine().await;

        let err = engine
            .create_customer(CustomerInput {
                name: "".to_string(),
                email: "alice@example.com".to_string(),
                phone: None,
            })
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            EngineError::Validation(ValidationError::Required { .. })
        ));

        // Nothing persisted.
        assert!(engine
            .db()
            .customers()
            .find_by_email("alice@example.com")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_bulk_create_continues_past_failures() {
        let engine = test_engine().await;

        let outcome = engine
            .bulk_create_customers(vec![
                customer_input("Alice", "alice@example.com"),
                customer_input("Dupe", "alice@example.com"),
                customer_input("Carol", "carol@example.com"),
            ])
            .await
            .unwrap();

        assert_eq!(outcome.customers.len(), 2);
        assert_eq!(outcome.customers[0].name, "Alice");
        assert_eq!(outcome.customers[1].name, "Carol");
        assert_eq!(outcome.errors.len(), 1);
        assert!(outcome.errors[0].starts_with("alice@example.com:"));
    }

    #[tokio::test]
    async fn test_create_product_price_bounds() {
        let engine = test_engine().await;

        for bad_price in [0, -5] {
            let err = engine
                .create_product(product_input("Widget", bad_price, 10))
                .await
                .unwrap_err();
            assert!(matches!(
                err,
                EngineError::Validation(ValidationError::InvalidRange { .. })
            ));
        }

        // One cent is the smallest valid price.
        let created = engine
            .create_product(product_input("Widget", 1, 10))
            .await
            .unwrap();
        assert_eq!(created.entity.price_cents, 1);
    }

    #[tokio::test]
    async fn test_create_product_defaults_stock_to_zero() {
        let engine = test_engine().await;

        let created = engine
            .create_product(ProductInput {
                name: "Widget".to_string(),
                price_cents: 100,
                stock: None,
            })
            .await
            .unwrap();
        assert_eq!(created.entity.stock, 0);
    }

    #[tokio::test]
    async fn test_create_order_resolution_policy() {
        let engine = test_engine().await;
        let customer = engine
            .create_customer(customer_input("Alice", "alice@example.com"))
            .await
            .unwrap()
            .entity;
        let p1 = engine
            .create_product(product_input("Widget", 1000, 10))
            .await
            .unwrap()
            .entity;

        // Unknown customer is fatal.
        let err = engine
            .create_order(OrderInput {
                customer_id: "missing".to_string(),
                product_ids: vec![p1.id.clone()],
            })
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::NotFound { ref entity } if entity == "customer"));

        // All-unknown products are fatal.
        let err = engine
            .create_order(OrderInput {
                customer_id: customer.id.clone(),
                product_ids: vec!["missing".to_string()],
            })
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::NotFound { ref entity } if entity == "products"));

        // A partial miss proceeds with the resolvable subset.
        let created = engine
            .create_order(OrderInput {
                customer_id: customer.id.clone(),
                product_ids: vec![p1.id.clone(), "missing".to_string()],
            })
            .await
            .unwrap();
        assert_eq!(created.entity.total_amount_cents, Some(1000));
    }

    #[tokio::test]
    async fn test_order_total_is_a_snapshot() {
        let engine = test_engine().await;
        let customer = engine
            .create_customer(customer_input("Alice", "alice@example.com"))
            .await
            .unwrap()
            .entity;
        let p1 = engine
            .create_product(product_input("Widget", 1000, 10))
            .await
            .unwrap()
            .entity;

        let order = engine
            .create_order(OrderInput {
                customer_id: customer.id,
                product_ids: vec![p1.id.clone()],
            })
            .await
            .unwrap()
            .entity;
        assert_eq!(order.total_amount_cents, Some(1000));

        // A later price change must not move the stored total.
        sqlx::query("UPDATE products SET price_cents = 9999 WHERE id = ?1")
            .bind(&p1.id)
            .execute(engine.db().pool())
            .await
            .unwrap();

        let stored = engine.db().orders().get_by_id(&order.id).await.unwrap().unwrap();
        assert_eq!(stored.total_amount_cents, Some(1000));
    }

    #[tokio::test]
    async fn test_update_low_stock_products() {
        let engine = test_engine().await;

        let outcome = engine.update_low_stock_products().await.unwrap();
        assert!(outcome.products.is_empty());
        assert_eq!(outcome.message, "No low stock products found");

        engine
            .create_product(product_input("Low", 100, 3))
            .await
            .unwrap();
        engine
            .create_product(product_input("AtThreshold", 100, LOW_STOCK_THRESHOLD))
            .await
            .unwrap();

        let outcome = engine.update_low_stock_products().await.unwrap();
        assert_eq!(outcome.products.len(), 1);
        assert_eq!(outcome.products[0].name, "Low");
        assert_eq!(outcome.products[0].stock, 3 + RESTOCK_INCREMENT);
        assert_eq!(outcome.message, "Restocked 1 products");
    }
}
