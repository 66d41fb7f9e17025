// ============================================================================
// Order Store - Durable keyed storage for Order records
// ============================================================================
//
// Only the persisted fields of an Order travel through a store. The transient
// customer/products snapshot is dropped on every write.
//
// Single-record operations rely on the backend's own atomicity; there is no
// application-level locking or version token.
//
// ============================================================================

mod memory;
mod postgres;

use async_trait::async_trait;

use crate::domain::order::{Order, OrderError};

pub use memory::InMemoryOrderStore;
pub use postgres::PgOrderStore;

#[async_trait]
pub trait OrderStore: Send + Sync {
    /// All orders, ordered by id
    async fn find_all(&self) -> Result<Vec<Order>, OrderError>;

    /// Fails with `OrderError::NotFound` when the id is absent
    async fn find_by_id(&self, id: i64) -> Result<Order, OrderError>;

    /// Persist a new record; the `id` of the argument is ignored
    async fn insert(&self, order: &Order) -> Result<Order, OrderError>;

    /// Overwrite the persisted fields of an existing record
    async fn replace(&self, order: &Order) -> Result<(), OrderError>;

    /// Idempotent: deleting an absent id is a no-op
    async fn delete_by_id(&self, id: i64) -> Result<(), OrderError>;
}
