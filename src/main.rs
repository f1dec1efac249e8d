use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use cprimes::api::{create_router, AppState};
use cprimes::config::ServerConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(std::env::var(EnvFilter::DEFAULT_ENV).ok()))
        .init();

    let config = ServerConfig::from_env()?;
    let app = create_router(Arc::new(AppState::new(&config)));

    let addr = config.addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!(
        "Server running on {} (version {}, at most {} primes per request)",
        addr,
        cprimes::VERSION,
        config.max_count
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

/// `RUST_LOG` when it is set and valid, `cprimes=info` otherwise.
fn env_filter(directives: Option<String>) -> EnvFilter {
    directives
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new("cprimes=info"))
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for Ctrl-C: {}", err);
    }
}
