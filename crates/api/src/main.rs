//! API server entry point.

use api::config::Config;
use checkout::CheckoutOptions;
use ledger::{InMemoryLedger, PostgresLedger};
use sqlx::postgres::PgPoolOptions;
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

async fn serve(app: axum::Router, addr: &str) {
    tracing::info!(%addr, "starting API server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("failed to bind address");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("server error");

    tracing::info!("server shut down gracefully");
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

    let options = CheckoutOptions {
        call_timeout: config.upstream_timeout,
        clear_basket_after_payment: config.clear_basket_after_payment,
    };

    // 3. Build application state: Postgres ledger when DATABASE_URL is
    // set, in-memory otherwise; HTTP upstream clients when all three
    // base URLs are set, seeded in-memory stores otherwise.
    let app = match &config.database_url {
        Some(url) => {
            let pool = PgPoolOptions::new()
                .max_connections(5)
                .connect(url)
                .await
                .expect("failed to connect to Postgres");
            let ledger = PostgresLedger::new(pool);
            ledger
                .ensure_schema()
                .await
                .expect("failed to bootstrap orders schema");
            tracing::info!("using Postgres order ledger");
            build_app(ledger, &config, options, metrics_handle)
        }
        None => {
            tracing::info!("using in-memory order ledger");
            build_app(InMemoryLedger::new(), &config, options, metrics_handle)
        }
    };

    // 4. Start server
    serve(app, &config.addr()).await;
}

fn build_app<L: ledger::OrderLedger + Clone + 'static>(
    ledger: L,
    config: &Config,
    options: CheckoutOptions,
    metrics_handle: metrics_exporter_prometheus::PrometheusHandle,
) -> axum::Router {
    match config.upstream_urls() {
        Some((basket_url, catalog_url, payment_url)) => {
            tracing::info!(%basket_url, %catalog_url, %payment_url, "using HTTP upstream clients");
            let state = api::create_http_state(
                ledger,
                basket_url,
                catalog_url,
                payment_url,
                config.upstream_timeout,
                options,
            )
            .expect("failed to build upstream clients");
            api::create_app(state, metrics_handle)
        }
        None => {
            tracing::info!("using seeded in-memory upstream stores");
            let (state, _, _, _) = api::create_default_state(ledger, options);
            api::create_app(state, metrics_handle)
        }
    }
}
