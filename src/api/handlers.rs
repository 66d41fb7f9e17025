use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;

use super::errors::ApiError;
use super::AppState;
use crate::domain::order::{AggregationPolicy, DispatchOutcome, NewOrder, OrderUpdate};

#[derive(Deserialize, Debug, Default)]
pub struct ListQuery {
    #[serde(default)]
    pub policy: AggregationPolicy,
}

/// `?policy=best_effort` returns the orders that could be aggregated plus
/// one failure entry per order that could not. The default fails the whole
/// listing on the first failure.
pub async fn list_orders(
    state: web::Data<AppState>,
    query: web::Query<ListQuery>,
) -> Result<HttpResponse, ApiError> {
    let orders = state.store.find_all().await?;

    match query.policy {
        AggregationPolicy::FailFast => {
            let orders = state.aggregator.aggregate(orders).await?;
            Ok(HttpResponse::Ok().json(orders))
        }
        AggregationPolicy::BestEffort => {
            let ids: Vec<i64> = orders.iter().map(|o| o.id).collect();
            let outcomes = state.aggregator.aggregate_each(orders).await;

            let mut aggregated = Vec::new();
            let mut failures = Vec::new();
            for (order_id, outcome) in ids.into_iter().zip(outcomes) {
                match outcome {
                    Ok(order) => aggregated.push(order),
                    Err(e) => failures.push(json!({
                        "order_id": order_id,
                        "error": e.to_string(),
                    })),
                }
            }

            Ok(HttpResponse::Ok().json(json!({
                "orders": aggregated,
                "failures": failures,
            })))
        }
    }
}

pub async fn get_order(
    state: web::Data<AppState>,
    id: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    let order = state.store.find_by_id(id.into_inner()).await?;
    let order = state.aggregator.aggregate_one(order).await?;

    Ok(HttpResponse::Ok().json(json!({
        "status": "Fetch order",
        "order": order,
    })))
}

pub async fn create_order(
    state: web::Data<AppState>,
    payload: web::Json<NewOrder>,
) -> Result<HttpResponse, ApiError> {
    let order = state.store.insert(&payload.into_inner().into_order()).await?;

    tracing::info!(order_id = order.id, customer_id = order.customer_id, status = %order.status, "Order created");

    Ok(HttpResponse::Created().json(json!({
        "status": "Created",
        "order": order,
    })))
}

pub async fn get_destination(
    state: web::Data<AppState>,
    id: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    let order = state.store.find_by_id(id.into_inner()).await?;
    let order = state.aggregator.aggregate_one(order).await?;

    Ok(HttpResponse::Ok().json(json!({
        "Destination": order.destination(),
    })))
}

pub async fn update_order(
    state: web::Data<AppState>,
    id: web::Path<i64>,
    payload: web::Json<OrderUpdate>,
) -> Result<HttpResponse, ApiError> {
    let mut order = state.store.find_by_id(id.into_inner()).await?;
    payload.apply_to(&mut order);
    state.store.replace(&order).await?;

    tracing::info!(order_id = order.id, status = %order.status, "Order updated");

    Ok(HttpResponse::Ok().json(json!({
        "status": "Update",
        "order": order,
    })))
}

pub async fn delete_order(
    state: web::Data<AppState>,
    id: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    let id = id.into_inner();
    state.store.delete_by_id(id).await?;

    tracing::info!(order_id = id, "Order deleted");

    Ok(HttpResponse::Ok().json(json!({ "status": "Deleted" })))
}

pub async fn request_shipping(
    state: web::Data<AppState>,
    id: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    let outcome = state.dispatcher.request_shipping(id.into_inner()).await?;
    Ok(dispatch_response(outcome))
}

pub async fn request_notification(
    state: web::Data<AppState>,
    id: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    let outcome = state.dispatcher.request_notification(id.into_inner()).await?;
    Ok(dispatch_response(outcome))
}

fn dispatch_response(outcome: DispatchOutcome) -> HttpResponse {
    match outcome {
        DispatchOutcome::Delivered { status, body } => HttpResponse::Ok().json(json!({
            "status": "Delivered",
            "remote_status": status,
            "body": body,
        })),
        DispatchOutcome::Rejected { status, body } => HttpResponse::BadGateway().json(json!({
            "status": "Rejected",
            "remote_status": status,
            "body": body,
        })),
        DispatchOutcome::Unreachable { cause } => HttpResponse::ServiceUnavailable().json(json!({
            "status": "Unreachable",
            "error": cause,
        })),
    }
}
