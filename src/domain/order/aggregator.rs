use serde::Deserialize;
use std::sync::Arc;

use super::errors::OrderError;
use super::model::Order;
use crate::clients::{CustomerDirectory, ShoppingCartService};
use crate::metrics::Metrics;

// ============================================================================
// Order Aggregator
// ============================================================================
//
// Merges a stored order with its customer (directory service) and its
// products (cart service). Per order, both lookups are issued before either
// result is inspected. Lookups run sequentially: 2N calls for N orders, no
// deduplication, no retry.
//
// Dropping the returned future stops any remaining lookups.
//
// ============================================================================

/// How a multi-order aggregation reacts to a failing order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AggregationPolicy {
    /// The first failure fails the whole batch
    #[default]
    FailFast,
    /// Every order is attempted and reported individually
    BestEffort,
}

pub type AggregateOutcome = Result<Order, OrderError>;

pub struct OrderAggregator {
    directory: Arc<dyn CustomerDirectory>,
    carts: Arc<dyn ShoppingCartService>,
    metrics: Arc<Metrics>,
}

impl OrderAggregator {
    pub fn new(
        directory: Arc<dyn CustomerDirectory>,
        carts: Arc<dyn ShoppingCartService>,
        metrics: Arc<Metrics>,
    ) -> Self {
        Self {
            directory,
            carts,
            metrics,
        }
    }

    /// All-or-nothing aggregation: either every order comes back enriched or
    /// the batch fails with the first `AggregationFailed`.
    pub async fn aggregate(&self, orders: Vec<Order>) -> Result<Vec<Order>, OrderError> {
        let order_count = orders.len();
        let mut aggregated = Vec::with_capacity(order_count);

        for order in orders {
            match self.enrich(order).await {
                Ok(order) => aggregated.push(order),
                Err(e) => {
                    self.metrics.record_aggregation(false);
                    tracing::warn!(order_count, error = %e, "Aggregation aborted");
                    return Err(e);
                }
            }
        }

        self.metrics.record_aggregation(true);
        tracing::debug!(order_count, "Aggregated orders");
        Ok(aggregated)
    }

    pub async fn aggregate_one(&self, order: Order) -> Result<Order, OrderError> {
        let result = self.enrich(order).await;
        self.metrics.record_aggregation(result.is_ok());
        if let Err(e) = &result {
            tracing::warn!(error = %e, "Aggregation aborted");
        }
        result
    }

    /// Per-order outcomes; one failing order does not affect the others.
    pub async fn aggregate_each(&self, orders: Vec<Order>) -> Vec<AggregateOutcome> {
        let mut outcomes = Vec::with_capacity(orders.len());
        for order in orders {
            outcomes.push(self.enrich(order).await);
        }

        let failed = outcomes.iter().filter(|o| o.is_err()).count();
        self.metrics.record_aggregation(failed == 0);
        if failed > 0 {
            tracing::warn!(failed, order_count = outcomes.len(), "Some orders could not be aggregated");
        }
        outcomes
    }

    async fn enrich(&self, mut order: Order) -> AggregateOutcome {
        let customer = self.directory.fetch_customer(order.customer_id).await;
        let products = self.carts.fetch_products(order.shopping_cart_id).await;

        let order_id = order.id;
        order.customer = customer.map_err(|e| OrderError::aggregation_failed(order_id, e))?;
        order.products = products.map_err(|e| OrderError::aggregation_failed(order_id, e))?;
        Ok(order)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::order::{Customer, OrderStatus, Product};
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct FakeDirectory {
        customers: HashMap<i64, Customer>,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl CustomerDirectory for FakeDirectory {
        async fn fetch_customer(&self, customer_id: i64) -> Result<Customer, OrderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.customers
                .get(&customer_id)
                .cloned()
                .ok_or_else(|| OrderError::RemoteCallFailed {
                    service: "directory",
                    reason: "HTTP 500 Internal Server Error".to_string(),
                })
        }
    }

    #[derive(Default)]
    struct FakeCarts {
        carts: HashMap<i64, Vec<Product>>,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl ShoppingCartService for FakeCarts {
        async fn fetch_products(&self, cart_id: i64) -> Result<Vec<Product>, OrderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.carts.get(&cart_id).cloned().ok_or_else(|| OrderError::DecodeFailed {
                service: "cart",
                reason: "expected a sequence".to_string(),
            })
        }
    }

    fn customer(name: &str) -> Customer {
        Customer {
            name: name.to_string(),
            country: "US".into(),
            city: "NYC".into(),
            address: "1 Main".into(),
            ..Customer::default()
        }
    }

    fn product(id: u64, name: &str) -> Product {
        Product {
            id,
            name: name.to_string(),
            cost: 1.5,
            quantity: 2,
            country: String::new(),
            city: String::new(),
        }
    }

    fn order(id: i64, customer_id: i64, cart_id: i64) -> Order {
        Order {
            id,
            customer_id,
            status: OrderStatus::Pending,
            shopping_cart_id: cart_id,
            total_cost: 3.0,
            customer: Customer::default(),
            products: Vec::new(),
        }
    }

    struct Fixture {
        directory: Arc<FakeDirectory>,
        carts: Arc<FakeCarts>,
        aggregator: OrderAggregator,
    }

    fn fixture() -> Fixture {
        let mut directory = FakeDirectory::default();
        directory.customers.insert(3, customer("Ann"));
        directory.customers.insert(4, customer("Bob"));

        let mut carts = FakeCarts::default();
        carts.carts.insert(9, vec![product(2, "Ink"), product(1, "Pen")]);
        carts.carts.insert(10, vec![product(7, "Stapler")]);

        let directory = Arc::new(directory);
        let carts = Arc::new(carts);
        let aggregator = OrderAggregator::new(
            directory.clone(),
            carts.clone(),
            Arc::new(Metrics::new().unwrap()),
        );

        Fixture {
            directory,
            carts,
            aggregator,
        }
    }

    #[tokio::test]
    async fn test_aggregate_populates_only_transient_fields() {
        let fx = fixture();
        let stored = order(7, 3, 9);

        let aggregated = fx.aggregator.aggregate(vec![stored.clone()]).await.unwrap();

        assert_eq!(aggregated.len(), 1);
        assert_eq!(aggregated[0].customer.name, "Ann");
        assert_eq!(aggregated[0].products.len(), 2);
        assert_eq!(aggregated[0].without_enrichment(), stored);
    }

    #[tokio::test]
    async fn test_product_order_is_preserved() {
        let fx = fixture();

        let aggregated = fx.aggregator.aggregate_one(order(7, 3, 9)).await.unwrap();

        let ids: Vec<_> = aggregated.products.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![2, 1]);
    }

    #[tokio::test]
    async fn test_one_bad_order_fails_the_batch() {
        let fx = fixture();
        let orders = vec![order(1, 4, 10), order(2, 99, 9)];

        let result = fx.aggregator.aggregate(orders).await;

        match result {
            Err(OrderError::AggregationFailed { order_id, source }) => {
                assert_eq!(order_id, 2);
                assert!(matches!(*source, OrderError::RemoteCallFailed { .. }));
            }
            other => panic!("expected aggregation failure, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_both_lookups_are_made_when_directory_fails() {
        let fx = fixture();

        let result = fx.aggregator.aggregate(vec![order(1, 99, 9)]).await;

        assert!(result.is_err());
        assert_eq!(fx.directory.calls.load(Ordering::SeqCst), 1);
        assert_eq!(fx.carts.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_shared_customer_is_fetched_per_order() {
        let fx = fixture();
        let orders = vec![order(1, 3, 9), order(2, 3, 10), order(3, 3, 9)];

        fx.aggregator.aggregate(orders).await.unwrap();

        assert_eq!(fx.directory.calls.load(Ordering::SeqCst), 3);
        assert_eq!(fx.carts.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_cart_decode_failure_is_wrapped() {
        let fx = fixture();

        let result = fx.aggregator.aggregate_one(order(5, 3, 404)).await;

        match result {
            Err(OrderError::AggregationFailed { order_id: 5, source }) => {
                assert!(matches!(*source, OrderError::DecodeFailed { service: "cart", .. }));
            }
            other => panic!("expected aggregation failure, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_best_effort_reports_each_order() {
        let fx = fixture();
        let orders = vec![order(1, 3, 9), order(2, 99, 9), order(3, 4, 10)];

        let outcomes = fx.aggregator.aggregate_each(orders).await;

        assert_eq!(outcomes.len(), 3);
        assert_eq!(outcomes[0].as_ref().unwrap().customer.name, "Ann");
        assert!(outcomes[1].is_err());
        assert_eq!(outcomes[2].as_ref().unwrap().customer.name, "Bob");
    }

    #[test]
    fn test_policy_parses_from_query_value() {
        let policy: AggregationPolicy = serde_json::from_str("\"best_effort\"").unwrap();
        assert_eq!(policy, AggregationPolicy::BestEffort);
        assert_eq!(AggregationPolicy::default(), AggregationPolicy::FailFast);
    }

    #[tokio::test]
    async fn test_empty_listing_aggregates_to_empty() {
        let fx = fixture();
        let aggregated = fx.aggregator.aggregate(Vec::new()).await.unwrap();
        assert!(aggregated.is_empty());
        assert_eq!(fx.directory.calls.load(Ordering::SeqCst), 0);
    }
}
