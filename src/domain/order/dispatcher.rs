use reqwest::{Client, StatusCode};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

use super::errors::OrderError;
use super::model::Order;
use crate::metrics::Metrics;
use crate::store::OrderStore;

// ============================================================================
// Order Dispatcher
// ============================================================================
//
// Sends order events to the shipping and notification services. The order is
// re-read from the store right before each send; no aggregation is involved.
//
// ============================================================================

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ShippingRequest {
    pub order_id: i64,
    pub customer_id: i64,
}

impl ShippingRequest {
    pub fn for_order(order: &Order) -> Self {
        Self {
            order_id: order.id,
            customer_id: order.customer_id,
        }
    }
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct NotificationRequest {
    pub customer_id: i64,
    pub message: String,
}

impl NotificationRequest {
    pub fn for_order(order: &Order) -> Self {
        Self {
            customer_id: order.customer_id,
            message: format!("order {}", order.status),
        }
    }
}

/// What happened to one outbound request
#[derive(Debug, Clone, PartialEq)]
pub enum DispatchOutcome {
    /// Collaborator answered 2xx
    Delivered { status: u16, body: Value },
    /// Collaborator answered with a non-2xx status
    Rejected { status: u16, body: Value },
    /// Transport failure or timeout; nothing was answered
    Unreachable { cause: String },
}

impl DispatchOutcome {
    pub fn label(&self) -> &'static str {
        match self {
            DispatchOutcome::Delivered { .. } => "delivered",
            DispatchOutcome::Rejected { .. } => "rejected",
            DispatchOutcome::Unreachable { .. } => "unreachable",
        }
    }
}

pub struct OrderDispatcher {
    store: Arc<dyn OrderStore>,
    client: Client,
    shipping_endpoint: String,
    notification_endpoint: String,
    metrics: Arc<Metrics>,
}

impl OrderDispatcher {
    pub fn new(
        store: Arc<dyn OrderStore>,
        shipping_url: &str,
        notification_url: &str,
        timeout: Duration,
        metrics: Arc<Metrics>,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            store,
            client,
            shipping_endpoint: format!("{}/shipping/receive", shipping_url.trim_end_matches('/')),
            notification_endpoint: format!(
                "{}/notification/send",
                notification_url.trim_end_matches('/')
            ),
            metrics,
        })
    }

    /// POST `{order_id, customer_id}` to the shipping service
    pub async fn request_shipping(&self, order_id: i64) -> Result<DispatchOutcome, OrderError> {
        let order = self.store.find_by_id(order_id).await?;
        let payload = ShippingRequest::for_order(&order);

        Ok(self.post("shipping", &self.shipping_endpoint, order_id, &payload).await)
    }

    /// POST `{customer_id, message: "order <status>"}` to the notification service
    pub async fn request_notification(&self, order_id: i64) -> Result<DispatchOutcome, OrderError> {
        let order = self.store.find_by_id(order_id).await?;
        let payload = NotificationRequest::for_order(&order);

        Ok(self
            .post("notification", &self.notification_endpoint, order_id, &payload)
            .await)
    }

    async fn post<T: Serialize>(
        &self,
        kind: &'static str,
        url: &str,
        order_id: i64,
        payload: &T,
    ) -> DispatchOutcome {
        let outcome = match self.client.post(url).json(payload).send().await {
            Err(e) => DispatchOutcome::Unreachable {
                cause: e.to_string(),
            },
            Ok(response) => {
                let status = response.status();
                match response.text().await {
                    Ok(text) => answered(status, Some(text)),
                    Err(e) => {
                        tracing::warn!(kind, order_id, status = status.as_u16(), error = %e, "Dispatch response body unreadable");
                        answered(status, None)
                    }
                }
            }
        };

        self.metrics.record_dispatch(kind, outcome.label());
        match &outcome {
            DispatchOutcome::Delivered { status, .. } => {
                tracing::info!(kind, order_id, status, url, "✅ Order dispatch delivered");
            }
            DispatchOutcome::Rejected { status, .. } => {
                tracing::warn!(kind, order_id, status, url, "Order dispatch rejected");
            }
            DispatchOutcome::Unreachable { cause } => {
                tracing::error!(kind, order_id, cause = %cause, url, "Order dispatch target unreachable");
            }
        }

        outcome
    }
}

/// The target replied, so the outcome follows its status even when the body
/// could not be read.
fn answered(status: StatusCode, body: Option<String>) -> DispatchOutcome {
    let body = body.map_or(Value::Null, relay_body);
    if status.is_success() {
        DispatchOutcome::Delivered {
            status: status.as_u16(),
            body,
        }
    } else {
        DispatchOutcome::Rejected {
            status: status.as_u16(),
            body,
        }
    }
}

/// JSON bodies are relayed as JSON, anything else as a string
fn relay_body(text: String) -> Value {
    if text.is_empty() {
        return Value::Null;
    }
    serde_json::from_str(&text).unwrap_or(Value::String(text))
}
