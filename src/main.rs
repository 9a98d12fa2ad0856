//! ChatCart - conversational shopping assistant
//!
//! A Rust backend driving a shopping dialogue state machine: browse a
//! catalog, fill a cart, apply discount codes and place orders through
//! plain chat messages.

mod api;
mod catalog;
mod config;
mod pricing;
mod runtime;
mod session;
mod state_machine;

use api::{create_router, AppState};
use catalog::{CatalogStore, JsonCatalog};
use config::Config;
use runtime::ChatEngine;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "chatcart=info,tower_http=debug".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false),
        )
        .init();

    let config = Config::from_env();

    // Load catalog
    tracing::info!(path = %config.catalog_path.display(), "Loading catalog");
    let catalog = JsonCatalog::load(&config.catalog_path)?;
    if catalog.products().is_empty() {
        tracing::warn!("Catalog has no products");
    }
    tracing::info!(
        categories = catalog.categories().len(),
        products = catalog.products().len(),
        "Catalog loaded"
    );

    // Create application state
    let engine = ChatEngine::new(Arc::new(catalog), config.shopper_name);
    let state = AppState::new(engine);
    state
        .sessions
        .clone()
        .spawn_idle_sweeper(config.session_idle_timeout);

    // Create router
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = create_router(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("ChatCart server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
