//! HTTP boundary consumed by the web UI

pub mod routes;

pub use routes::{router, AppState, GENERATE_BET_PATH};

use anyhow::{Context, Result};
use tokio::net::TcpListener;

/// Bind `bind_addr` and serve until the process is stopped.
pub async fn serve(bind_addr: &str, state: AppState) -> Result<()> {
    let listener = TcpListener::bind(bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", bind_addr))?;
    tracing::info!(
        "Listening on {} (upstream: {})",
        bind_addr,
        state.normalizer.client_name()
    );

    axum::serve(listener, router(state))
        .await
        .context("HTTP server error")?;
    Ok(())
}
