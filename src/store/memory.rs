use async_trait::async_trait;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

use super::OrderStore;
use crate::domain::order::{Order, OrderError};

/// Process-local store used by tests and `ORDER_STORE=memory`
#[derive(Default)]
pub struct InMemoryOrderStore {
    state: RwLock<MemoryState>,
}

#[derive(Default)]
struct MemoryState {
    last_id: i64,
    orders: BTreeMap<i64, Order>,
}

impl InMemoryOrderStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl OrderStore for InMemoryOrderStore {
    async fn find_all(&self) -> Result<Vec<Order>, OrderError> {
        let state = self.state.read().await;
        Ok(state.orders.values().cloned().collect())
    }

    async fn find_by_id(&self, id: i64) -> Result<Order, OrderError> {
        let state = self.state.read().await;
        state.orders.get(&id).cloned().ok_or(OrderError::NotFound(id))
    }

    async fn insert(&self, order: &Order) -> Result<Order, OrderError> {
        let mut state = self.state.write().await;
        state.last_id += 1;

        let mut stored = order.without_enrichment();
        stored.id = state.last_id;
        state.orders.insert(stored.id, stored.clone());

        tracing::debug!(order_id = stored.id, "Inserted order in memory store");
        Ok(stored)
    }

    async fn replace(&self, order: &Order) -> Result<(), OrderError> {
        let mut state = self.state.write().await;
        match state.orders.get_mut(&order.id) {
            Some(slot) => {
                *slot = order.without_enrichment();
                Ok(())
            }
            None => Err(OrderError::NotFound(order.id)),
        }
    }

    async fn delete_by_id(&self, id: i64) -> Result<(), OrderError> {
        let mut state = self.state.write().await;
        if state.orders.remove(&id).is_none() {
            tracing::debug!(order_id = id, "Delete of absent order ignored");
        }
        Ok(())
    }
}
