//! Business Signal Analyzer — Binary Entrypoint
//! Boots the Axum HTTP server, wiring routes, shared state, and middleware.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use business_signal_analyzer::api::{self, AppState};
use business_signal_analyzer::metrics::Metrics;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("business_signal_analyzer=info,warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env in local/dev; no-op where the vars come from the environment.
    // This enables WEIGHTS_CONFIG_PATH overrides from .env.
    let _ = dotenvy::dotenv();

    init_tracing();

    // Weights come from config/weights.toml (or WEIGHTS_CONFIG_PATH);
    // a missing or malformed file falls back to defaults with a warning.
    let state = AppState::from_env();

    let metrics = Metrics::init(state.connector_count());
    let router = api::router(state).merge(metrics.router());

    let addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8000".to_string());
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "listening");
    axum::serve(listener, router).await?;

    Ok(())
}
