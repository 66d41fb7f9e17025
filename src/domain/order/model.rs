use serde::{Deserialize, Serialize};

use super::value_objects::{Customer, OrderStatus, Product};

// ============================================================================
// Order Record and Request Payloads
// ============================================================================

/// The only locally-owned entity.
///
/// `customer` and `products` are transient: they are filled in by the
/// aggregator on read and never written to the store.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Order {
    pub id: i64,
    pub customer_id: i64,
    #[serde(default)]
    pub status: OrderStatus,
    pub shopping_cart_id: i64,
    #[serde(default, alias = "totalCost")]
    pub total_cost: f64,
    #[serde(default)]
    pub customer: Customer,
    #[serde(default)]
    pub products: Vec<Product>,
}

impl Order {
    /// Copy of the order with the transient enrichment dropped
    pub fn without_enrichment(&self) -> Self {
        Self {
            customer: Customer::default(),
            products: Vec::new(),
            ..self.clone()
        }
    }

    pub fn destination(&self) -> String {
        format!(
            "Country: {}, City: {}, Address: {}",
            self.customer.country, self.customer.city, self.customer.address
        )
    }
}

/// Body of a create request. The id is assigned by the store.
#[derive(Deserialize, Clone, Debug)]
pub struct NewOrder {
    pub customer_id: i64,
    pub shopping_cart_id: i64,
    #[serde(default)]
    pub status: OrderStatus,
    #[serde(default, alias = "totalCost")]
    pub total_cost: f64,
}

impl NewOrder {
    pub fn into_order(self) -> Order {
        Order {
            id: 0,
            customer_id: self.customer_id,
            status: self.status,
            shopping_cart_id: self.shopping_cart_id,
            total_cost: self.total_cost,
            customer: Customer::default(),
            products: Vec::new(),
        }
    }
}

/// Body of a partial update.
///
/// Only the persisted, client-owned fields are accepted; `customer` and
/// `products` in an incoming body are ignored.
#[derive(Deserialize, Clone, Debug, Default)]
pub struct OrderUpdate {
    pub shopping_cart_id: Option<i64>,
    pub status: Option<OrderStatus>,
    #[serde(alias = "totalCost")]
    pub total_cost: Option<f64>,
}

impl OrderUpdate {
    pub fn apply_to(&self, order: &mut Order) {
        if let Some(cart_id) = self.shopping_cart_id {
            order.shopping_cart_id = cart_id;
        }
        if let Some(status) = self.status {
            order.status = status;
        }
        if let Some(total_cost) = self.total_cost {
            order.total_cost = total_cost;
        }
    }
}
