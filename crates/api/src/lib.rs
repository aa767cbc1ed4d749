//! HTTP API server with observability for the order service.
//!
//! Exposes the checkout workflow and order queries as REST endpoints,
//! with structured logging (tracing) and Prometheus metrics.

pub mod config;
pub mod error;
pub mod routes;

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::routing::{get, post, put};
use checkout::{
    CheckoutOptions, CheckoutOrchestrator, HttpBasketClient, HttpCatalogClient, HttpPaymentClient,
    InMemoryBasketStore, InMemoryCatalogStore, InMemoryPaymentAuthorizer, OrderQueries,
};
use common::Money;
use domain::CatalogEntry;
use ledger::OrderLedger;
use metrics_exporter_prometheus::PrometheusHandle;
use reqwest::Url;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use routes::orders::AppState;

/// Creates the Axum application router with all routes and shared state.
pub fn create_app<L: OrderLedger + 'static>(
    state: Arc<AppState<L>>,
    metrics_handle: PrometheusHandle,
) -> Router {
    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::render))
        .with_state(metrics_handle);

    Router::new()
        .route("/health", get(routes::health::check))
        .route("/checkout", post(routes::orders::checkout::<L>))
        .route("/orders", get(routes::orders::list::<L>))
        .route("/orders/{id}", get(routes::orders::get::<L>))
        .route("/orders/{id}/status", put(routes::orders::update_status::<L>))
        .with_state(state)
        .merge(metrics_router)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}

/// Creates application state backed by seeded in-memory stores.
///
/// The store handles are returned alongside the state so callers can
/// fill baskets and steer the payment authorizer.
pub fn create_default_state<L: OrderLedger + Clone + 'static>(
    ledger: L,
    options: CheckoutOptions,
) -> (
    Arc<AppState<L>>,
    InMemoryBasketStore,
    InMemoryCatalogStore,
    InMemoryPaymentAuthorizer,
) {
    let basket = InMemoryBasketStore::new();
    let catalog = InMemoryCatalogStore::new();
    let payment = InMemoryPaymentAuthorizer::new();

    seed_catalog(&catalog);

    let orchestrator = CheckoutOrchestrator::with_options(
        ledger.clone(),
        Arc::new(basket.clone()),
        Arc::new(catalog.clone()),
        Arc::new(payment.clone()),
        options,
    );

    let state = Arc::new(AppState {
        orchestrator: Arc::new(orchestrator),
        queries: OrderQueries::new(ledger),
    });

    (state, basket, catalog, payment)
}

/// Creates application state backed by HTTP clients for the basket,
/// catalog and payment services.
pub fn create_http_state<L: OrderLedger + Clone + 'static>(
    ledger: L,
    basket_url: &str,
    catalog_url: &str,
    payment_url: &str,
    timeout: Duration,
    options: CheckoutOptions,
) -> Result<Arc<AppState<L>>, Box<dyn std::error::Error + Send + Sync>> {
    let basket = HttpBasketClient::new(Url::parse(basket_url)?, timeout)?;
    let catalog = HttpCatalogClient::new(Url::parse(catalog_url)?, timeout)?;
    let payment = HttpPaymentClient::new(Url::parse(payment_url)?, timeout)?;

    let orchestrator = CheckoutOrchestrator::with_options(
        ledger.clone(),
        Arc::new(basket),
        Arc::new(catalog),
        Arc::new(payment),
        options,
    );

    Ok(Arc::new(AppState {
        orchestrator: Arc::new(orchestrator),
        queries: OrderQueries::new(ledger),
    }))
}

/// Seeds the catalog with demo products if it carries none.
pub fn seed_catalog(catalog: &InMemoryCatalogStore) {
    if catalog.product_count() > 0 {
        return;
    }

    catalog.insert(CatalogEntry::new(
        1u64,
        "Apple iPhone 14",
        Money::from_cents(79900),
        10,
    ));
    catalog.insert(CatalogEntry::new(
        2u64,
        "Samsung Galaxy S23",
        Money::from_cents(69900),
        15,
    ));
    catalog.insert(CatalogEntry::new(
        3u64,
        "Google Pixel 7",
        Money::from_cents(59900),
        8,
    ));

    tracing::info!(products = 3, "seeded catalog with demo products");
}
