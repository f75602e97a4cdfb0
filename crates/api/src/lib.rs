//! HTTP API server with observability for the stock ledger system.
//!
//! Provides REST endpoints for transaction admission, stock levels,
//! dashboard summaries, and master-data records, with structured logging
//! (tracing) and Prometheus metrics.

pub mod config;
pub mod error;
pub mod masterdata;
pub mod routes;

use std::sync::Arc;

use aggregator::StockAggregator;
use axum::Router;
use axum::routing::{get, post};
use dashboard::{DashboardSummarizer, ThresholdPolicy};
use gateway::TransactionGateway;
use ledger::LedgerStore;
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use masterdata::InMemoryMasterData;
use routes::inventory::AppState;

/// Creates the Axum application router with all routes and shared state.
pub fn create_app<S: LedgerStore + 'static>(
    state: Arc<AppState<S>>,
    metrics_handle: PrometheusHandle,
) -> Router {
    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::get))
        .with_state(metrics_handle);

    Router::new()
        .route("/health", get(routes::health::check))
        .route(
            "/inventory/transactions",
            post(routes::inventory::submit_transaction::<S>),
        )
        .route("/inventory/stock", get(routes::inventory::list_stock::<S>))
        .route("/dashboard", get(routes::dashboard::get::<S>))
        .route("/products", post(routes::master::create_product::<S>))
        .route("/products", get(routes::master::list_products::<S>))
        .route("/customers", post(routes::master::create_customer::<S>))
        .route("/customers", get(routes::master::list_customers::<S>))
        .route("/suppliers", post(routes::master::create_supplier::<S>))
        .route("/suppliers", get(routes::master::list_suppliers::<S>))
        .route("/warehouses", post(routes::master::create_warehouse::<S>))
        .route("/warehouses", get(routes::master::list_warehouses::<S>))
        .route("/taxes", post(routes::master::create_tax::<S>))
        .route("/taxes", get(routes::master::list_taxes::<S>))
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

/// Creates the default application state wired around a ledger store.
///
/// The returned aggregator handle shares the cell table with the gateway
/// and summarizer; callers use it for startup catch-up (`rebuild`).
pub fn create_default_state<S: LedgerStore + Clone + 'static>(
    store: S,
    low_stock_threshold: i64,
) -> (Arc<AppState<S>>, StockAggregator) {
    let master_data = InMemoryMasterData::new();
    let aggregator = StockAggregator::new();

    let gateway = TransactionGateway::new(store, aggregator.clone(), master_data.clone());
    let summarizer = DashboardSummarizer::with_policy(
        aggregator.clone(),
        master_data.clone(),
        ThresholdPolicy::new(low_stock_threshold),
    );

    let state = Arc::new(AppState {
        gateway,
        summarizer,
        master_data,
    });

    (state, aggregator)
}
