use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions, PgRow};
use sqlx::Row;

use super::OrderStore;
use crate::domain::order::{Customer, Order, OrderError, OrderStatus};

// ============================================================================
// PostgreSQL Order Store
// ============================================================================
//
// Table `orders` holds only the persisted columns. Status is stored as its
// ordinal.
//
// ============================================================================

pub struct PgOrderStore {
    pool: PgPool,
}

impl PgOrderStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, sqlx::Error> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;

        Ok(Self::new(pool))
    }

    /// Create the orders table if it does not exist yet
    pub async fn ensure_schema(&self) -> Result<(), sqlx::Error> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS orders (
                id BIGSERIAL PRIMARY KEY,
                customer_id BIGINT NOT NULL,
                status SMALLINT NOT NULL DEFAULT 0,
                shopping_cart_id BIGINT NOT NULL,
                total_cost DOUBLE PRECISION NOT NULL DEFAULT 0
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        tracing::info!("Orders table ready");
        Ok(())
    }

    fn row_to_order(row: &PgRow) -> Result<Order, OrderError> {
        let ordinal: i16 = row.try_get("status").map_err(store_failed)?;
        let status = OrderStatus::from_ordinal(i64::from(ordinal))
            .ok_or_else(|| OrderError::StoreFailed(format!("unknown status ordinal {ordinal}")))?;

        Ok(Order {
            id: row.try_get("id").map_err(store_failed)?,
            customer_id: row.try_get("customer_id").map_err(store_failed)?,
            status,
            shopping_cart_id: row.try_get("shopping_cart_id").map_err(store_failed)?,
            total_cost: row.try_get("total_cost").map_err(store_failed)?,
            customer: Customer::default(),
            products: Vec::new(),
        })
    }
}

fn store_failed(e: sqlx::Error) -> OrderError {
    OrderError::StoreFailed(e.to_string())
}

#[async_trait]
impl OrderStore for PgOrderStore {
    async fn find_all(&self) -> Result<Vec<Order>, OrderError> {
        let rows = sqlx::query(
            "SELECT id, customer_id, status, shopping_cart_id, total_cost FROM orders ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(store_failed)?;

        tracing::debug!("Loaded {} orders", rows.len());
        rows.iter().map(Self::row_to_order).collect()
    }

    async fn find_by_id(&self, id: i64) -> Result<Order, OrderError> {
        let row = sqlx::query(
            "SELECT id, customer_id, status, shopping_cart_id, total_cost FROM orders WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(store_failed)?;

        match row {
            Some(row) => Self::row_to_order(&row),
            None => Err(OrderError::NotFound(id)),
        }
    }

    async fn insert(&self, order: &Order) -> Result<Order, OrderError> {
        let (id,): (i64,) = sqlx::query_as(
            r"
            INSERT INTO orders (customer_id, status, shopping_cart_id, total_cost)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            ",
        )
        .bind(order.customer_id)
        .bind(order.status.ordinal())
        .bind(order.shopping_cart_id)
        .bind(order.total_cost)
        .fetch_one(&self.pool)
        .await
        .map_err(store_failed)?;

        tracing::info!(order_id = id, customer_id = order.customer_id, "✅ Order persisted");

        let mut stored = order.without_enrichment();
        stored.id = id;
        Ok(stored)
    }

    async fn replace(&self, order: &Order) -> Result<(), OrderError> {
        let result = sqlx::query(
            r"
            UPDATE orders
            SET customer_id = $1, status = $2, shopping_cart_id = $3, total_cost = $4
            WHERE id = $5
            ",
        )
        .bind(order.customer_id)
        .bind(order.status.ordinal())
        .bind(order.shopping_cart_id)
        .bind(order.total_cost)
        .bind(order.id)
        .execute(&self.pool)
        .await
        .map_err(store_failed)?;

        if result.rows_affected() == 0 {
            return Err(OrderError::NotFound(order.id));
        }

        tracing::info!(order_id = order.id, status = %order.status, "✅ Order updated");
        Ok(())
    }

    async fn delete_by_id(&self, id: i64) -> Result<(), OrderError> {
        let result = sqlx::query("DELETE FROM orders WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(store_failed)?;

        tracing::info!(order_id = id, deleted = result.rows_affected(), "Order delete applied");
        Ok(())
    }
}
