//! API server entry point.

use api::config::Config;
use ledger::{InMemoryLedgerStore, PostgresLedgerStore};
use tokio::signal;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Waits for a shutdown signal (SIGINT or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install SIGINT handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("received SIGINT, starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("received SIGTERM, starting graceful shutdown");
        }
    }
}

#[tokio::main]
async fn main() {
    let config = Config::from_env();

    // 1. Initialize tracing
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.log_level.clone())),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // 2. Install Prometheus metrics recorder
    let prometheus_builder = metrics_exporter_prometheus::PrometheusBuilder::new();
    let metrics_handle = prometheus_builder
        .install_recorder()
        .expect("failed to install Prometheus recorder");

    // 3. Create the ledger store and application state. With a DATABASE_URL
    //    the ledger is durable in Postgres and the aggregator catches up by
    //    replaying it; otherwise everything lives in memory.
    let app = if let Some(database_url) = config.database_url.clone() {
        let pool = sqlx::PgPool::connect(&database_url)
            .await
            .expect("failed to connect to database");
        let store = PostgresLedgerStore::new(pool);
        store.run_migrations().await.expect("migrations failed");

        let (state, aggregator) =
            api::create_default_state(store.clone(), config.low_stock_threshold);
        aggregator
            .rebuild(&store)
            .await
            .expect("aggregator catch-up failed");
        tracing::info!("ledger backed by Postgres");

        api::create_app(state, metrics_handle)
    } else {
        let store = InMemoryLedgerStore::new();
        let (state, _aggregator) =
            api::create_default_state(store, config.low_stock_threshold);
        tracing::info!("ledger backed by in-memory store");

        api::create_app(state, metrics_handle)
    };

    // 4. Start server
    let addr = config.addr();
    tracing::info!(%addr, "starting API server");

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind address");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("server error");

    tracing::info!("server shut down gracefully");
}
