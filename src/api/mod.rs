// ============================================================================
// HTTP Endpoint Layer
// ============================================================================
//
// Request parsing and status codes only. Reads go through the aggregator,
// dispatches through the dispatcher, writes straight to the store.
//
// ============================================================================

mod errors;
mod handlers;

use actix_web::web;
use std::sync::Arc;

use crate::domain::order::{OrderAggregator, OrderDispatcher, OrderError};
use crate::store::OrderStore;

use errors::ApiError;

/// Shared, read-only handles for every worker
pub struct AppState {
    pub store: Arc<dyn OrderStore>,
    pub aggregator: Arc<OrderAggregator>,
    pub dispatcher: Arc<OrderDispatcher>,
}

/// Register the order routes plus JSON body and path id handling
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _req| {
        ApiError(OrderError::InvalidPayload(err.to_string())).into()
    }))
    .app_data(web::PathConfig::default().error_handler(|err, _req| {
        ApiError(OrderError::InvalidPayload(err.to_string())).into()
    }))
    .service(
        web::scope("/orders")
            .route("", web::get().to(handlers::list_orders))
            .route("/all", web::get().to(handlers::list_orders))
            .route("/request", web::post().to(handlers::create_order))
            .route("/{id}", web::get().to(handlers::get_order))
            .route("/{id}", web::patch().to(handlers::update_order))
            .route("/{id}", web::delete().to(handlers::delete_order))
            .route("/{id}/destination", web::get().to(handlers::get_destination))
            .route("/{id}/shipping", web::get().to(handlers::request_shipping))
            .route("/{id}/notify", web::get().to(handlers::request_notification)),
    );
}
