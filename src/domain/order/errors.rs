// ============================================================================
// Order Errors
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum OrderError {
    #[error("Order not found: {0}")]
    NotFound(i64),

    #[error("Call to {service} service failed: {reason}")]
    RemoteCallFailed {
        service: &'static str,
        reason: String,
    },

    #[error("Malformed response from {service} service: {reason}")]
    DecodeFailed {
        service: &'static str,
        reason: String,
    },

    #[error("Aggregation failed for order {order_id}: {source}")]
    AggregationFailed {
        order_id: i64,
        source: Box<OrderError>,
    },

    #[error("Order store failure: {0}")]
    StoreFailed(String),

    #[error("Invalid payload: {0}")]
    InvalidPayload(String),
}

impl OrderError {
    pub fn aggregation_failed(order_id: i64, cause: OrderError) -> Self {
        OrderError::AggregationFailed {
            order_id,
            source: Box::new(cause),
        }
    }

    /// True when the failure originated in a collaborator service
    pub fn is_remote(&self) -> bool {
        matches!(
            self,
            OrderError::RemoteCallFailed { .. }
                | OrderError::DecodeFailed { .. }
                | OrderError::AggregationFailed { .. }
        )
    }
}
