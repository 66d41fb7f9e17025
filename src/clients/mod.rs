// ============================================================================
// Collaborator Clients
// ============================================================================
//
// Read-side collaborators used by the aggregator:
// - CustomerDirectory   GET <directory>/customers/{id}
// - ShoppingCartService GET <cart>/shopping_cart/{id}
//
// ============================================================================

mod cart;
mod directory;
mod http;

use async_trait::async_trait;

use crate::domain::order::{Customer, OrderError, Product};

pub use cart::HttpShoppingCartService;
pub use directory::HttpCustomerDirectory;

#[async_trait]
pub trait CustomerDirectory: Send + Sync {
    async fn fetch_customer(&self, customer_id: i64) -> Result<Customer, OrderError>;
}

#[async_trait]
pub trait ShoppingCartService: Send + Sync {
    /// Products in the order the cart service returns them
    async fn fetch_products(&self, cart_id: i64) -> Result<Vec<Product>, OrderError>;
}
