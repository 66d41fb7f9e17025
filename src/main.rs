use actix_cors::Cors;
use actix_web::middleware::{Compress, Logger};
use actix_web::{web, App, HttpServer};
use std::sync::Arc;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod api;
mod clients;
mod config;
mod domain;
mod metrics;
mod store;

use clients::{HttpCustomerDirectory, HttpShoppingCartService};
use config::{Config, StoreBackend};
use domain::order::{OrderAggregator, OrderDispatcher};
use store::{InMemoryOrderStore, OrderStore, PgOrderStore};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    // Default to INFO level, can be overridden with RUST_LOG env var
    // Example: RUST_LOG=debug cargo run
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_thread_ids(true))
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,order_orchestrator=debug,sqlx=warn")),
        )
        .init();

    tracing::info!("🚀 Starting order orchestrator");

    let config = Config::from_env();
    tracing::debug!(
        store = ?config.store.backend,
        directory = %config.services.directory_url,
        cart = %config.services.cart_url,
        "Configuration resolved"
    );

    // === 1. Metrics ===
    let metrics = Arc::new(metrics::Metrics::new()?);
    let metrics_registry = Arc::new(metrics.registry().clone());

    // === 2. Order store ===
    let store: Arc<dyn OrderStore> = match config.store.backend {
        StoreBackend::Postgres => {
            tracing::info!("Connecting to PostgreSQL...");
            let pg = PgOrderStore::connect(&config.store.database_url, config.store.max_connections).await?;
            pg.ensure_schema().await?;
            Arc::new(pg)
        }
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory order store; orders are lost on restart");
            Arc::new(InMemoryOrderStore::new())
        }
    };

    // === 3. Collaborators ===
    let services = &config.services;
    let directory = Arc::new(HttpCustomerDirectory::new(
        &services.directory_url,
        services.lookup_timeout,
        metrics.clone(),
    )?);
    let carts = Arc::new(HttpShoppingCartService::new(
        &services.cart_url,
        services.lookup_timeout,
        metrics.clone(),
    )?);
    let aggregator = Arc::new(OrderAggregator::new(directory, carts, metrics.clone()));
    let dispatcher = Arc::new(OrderDispatcher::new(
        store.clone(),
        &services.shipping_url,
        &services.notification_url,
        services.dispatch_timeout,
        metrics.clone(),
    )?);

    let state = web::Data::new(api::AppState {
        store,
        aggregator,
        dispatcher,
    });

    // === 4. HTTP servers ===
    let metrics_server = metrics::metrics_server(
        metrics_registry,
        &config.server.host,
        config.server.metrics_port,
    )?;

    tracing::info!(
        "📡 Serving orders on http://{}:{}",
        config.server.host,
        config.server.port
    );
    let api_server = HttpServer::new(move || {
        App::new()
            .wrap(Cors::permissive())
            .wrap(Compress::default())
            .wrap(Logger::default())
            .app_data(state.clone())
            .configure(api::configure)
    })
    .bind((config.server.host.as_str(), config.server.port))?
    .run();

    tokio::try_join!(api_server, metrics_server)?;

    tracing::info!("Order orchestrator stopped");
    Ok(())
}
