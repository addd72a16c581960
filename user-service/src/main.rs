mod config;
mod error;
mod handlers;
mod routes;

#[cfg(test)]
mod tests;

use anyhow::Context;
use log::{info, warn};
use std::sync::Arc;
use user_crud_shared::store::StoreGateway;

use crate::config::ServiceConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize env_logger
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    info!("Logging initialized with env_logger");

    let config = ServiceConfig::from_env().context("invalid service configuration")?;
    info!(
        "Starting user service: bind_addr={}, database={}",
        config.bind_addr,
        config.database.path.display()
    );

    // Schema bootstrap runs once, before any request is accepted
    let gateway = StoreGateway::open(config.database.clone())
        .with_context(|| format!("failed to open {}", config.database.path.display()))?;
    let app = routes::create_router(Arc::new(gateway));

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;
    info!("listening on {}", config.bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Service finished");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl-C: {}", err);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                warn!("Failed to listen for SIGTERM: {}", err);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, draining connections");
}
