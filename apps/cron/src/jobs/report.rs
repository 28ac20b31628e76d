//! Weekly report: fetches all customers and orders through the query
//! surface, runs the pure aggregator, and appends one summary line.

use std::path::PathBuf;

use chrono::Local;
use tracing::{error, info};

use crate::jobs::Job;
use crate::logfile::append_line;
use crm_core::{
    report::summarize, Customer, CustomerFilter, Order, OrderFilter, Page, MAX_PAGE_SIZE,
};
use crm_engine::{Engine, EngineResult};

pub struct ReportJob {
    engine: Engine,
    log_path: PathBuf,
}

impl ReportJob {
    pub fn new(engine: Engine, log_path: PathBuf) -> Self {
        ReportJob { engine, log_path }
    }

    /// Pages through the full customer collection.
    async fn fetch_all_customers(&self) -> EngineResult<Vec<Customer>> {
        let mut customers = Vec::new();
        let mut offset = 0u32;
        loop {
            let conn = self
                .engine
                .all_customers(&CustomerFilter::default(), &Page::new(MAX_PAGE_SIZE, offset))
                .await?;
            let fetched = conn.len() as u32;
            let more = conn.has_next_page;
            customers.extend(conn.items);
            if !more {
                return Ok(customers);
            }
            offset += fetched;
        }
    }

    /// Pages through the full order collection.
    async fn fetch_all_orders(&self) -> EngineResult<Vec<Order>> {
        let mut orders = Vec::new();
        let mut offset = 0u32;
        loop {
            let conn = self
                .engine
                .all_orders(&OrderFilter::default(), &Page::new(MAX_PAGE_SIZE, offset))
                .await?;
            let fetched = conn.len() as u32;
            let more = conn.has_next_page;
            orders.extend(conn.items);
            if !more {
                return Ok(orders);
            }
            offset += fetched;
        }
    }

    async fn generate(&self) -> EngineResult<String> {
        let customers = self.fetch_all_customers().await?;
        let orders = self.fetch_all_orders().await?;
        let report = summarize(&customers, &orders);

        let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S");
        Ok(format!(
            "{timestamp} - Report: {} customers, {} orders, {} revenue",
            report.customer_count,
            report.order_count,
            report.total_revenue()
        ))
    }
}

impl Job for ReportJob {
    fn name(&self) -> &'static str {
        "report"
    }

    async fn run_once(&self) {
        match self.generate().await {
            Ok(line) => {
                append_line(&self.log_path, &line);
                info!("Report generated");
            }
            Err(err) => error!(%err, "Report job failed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logfile::tests_support::temp_log;
    use crm_core::{CustomerInput, OrderInput, ProductInput};
    use crm_db::{Database, DbConfig};

    #[tokio::test]
    async fn test_report_line_counts_and_revenue() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let engine = Engine::new(db);
        let path = temp_log("crm_report_test");
        let job = ReportJob::new(engine.clone(), path.clone());

        let customer = engine
            .create_customer(CustomerInput {
                name: "Alice".to_string(),
                email: "alice@example.com".to_string(),
                phone: None,
            })
            .await
            .unwrap()
            .entity;
        let product = engine
            .create_product(ProductInput {
                name: "Widget".to_string(),
                price_cents: 1250,
                stock: Some(5),
            })
            .await
            .unwrap()
            .entity;
        engine
            .create_order(OrderInput {
                customer_id: customer.id,
                product_ids: vec![product.id],
            })
            .await
            .unwrap();

        job.run_once().await;

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = contents.lines().collect();
        assert_eq!(lines.len(), 1);
        assert!(
            lines[0].ends_with("Report: 1 customers, 1 orders, $12.50 revenue"),
            "unexpected line: {}",
            lines[0]
        );

        std::fs::remove_file(&path).unwrap();
    }
}
