//! # geodash-api — Binary Entry Point
//!
//! Reads configuration from the environment, builds the catalog and serves
//! the API. Binds to `HOST:PORT` (default `127.0.0.1:8050`).

use std::net::SocketAddr;

use geodash_api::bootstrap::{bootstrap, install_metrics_recorder};
use geodash_api::config::{AppConfig, Environment};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            init_tracing(Environment::Development, false);
            tracing::error!("Configuration error: {e}");
            return Err(e.into());
        }
    };
    init_tracing(config.environment, config.debug);

    let metrics = match install_metrics_recorder() {
        Ok(handle) => Some(handle),
        Err(e) => {
            tracing::warn!("Prometheus recorder not installed: {e}. /metrics will return 503.");
            None
        }
    };

    let mut state = bootstrap(config.clone()).map_err(|e| {
        tracing::error!("Bootstrap failed: {e}");
        e
    })?;
    if let Some(handle) = metrics {
        state = state.with_metrics(handle);
    }

    let app = geodash_api::app(state);

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(
        addr = %addr,
        environment = %config.environment,
        debug = config.debug,
        allow_list = config.allowed_ips.len(),
        "geodash API listening"
    );

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}

/// Production logs are JSON lines; other profiles use the human formatter.
/// `RUST_LOG` overrides the default level.
fn init_tracing(environment: Environment, debug: bool) {
    let default_level = if debug { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    if environment == Environment::Production {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}
