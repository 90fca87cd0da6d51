//! Artizen API binary.
//!
//! Builds the provider chain from the environment, wires the dispatcher and
//! content generators, and runs the axum server with graceful shutdown on
//! ctrl-c.

use artizen::api::{ApiState, router};
use artizen::infra::llm::ProviderChain;
use tokio::signal;
use tracing_subscriber::EnvFilter;

const ENV_BIND: &str = "ARTIZEN_BIND";
const DEFAULT_BIND: &str = "127.0.0.1:8787";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing from RUST_LOG.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let chain = ProviderChain::from_env()?;
    if chain.is_empty() {
        tracing::warn!("no content providers configured; generation requests will fail");
    } else {
        tracing::info!(
            providers = ?chain.provider_names(),
            "configured content providers"
        );
    }

    let state = ApiState::new(chain)?;
    let app = router(state);

    let bind_address = std::env::var(ENV_BIND).unwrap_or_else(|_| DEFAULT_BIND.to_string());
    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    tracing::info!("artizen listening on {bind_address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("artizen shut down");
    Ok(())
}

/// Wait for ctrl-c signal for graceful shutdown.
async fn shutdown_signal() {
    if let Err(error) = signal::ctrl_c().await {
        tracing::error!(%error, "failed to install ctrl-c handler");
        return;
    }
    tracing::info!("received shutdown signal");
}
