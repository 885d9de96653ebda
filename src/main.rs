// src/main.rs
use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info};

use user_services::{
    app::{self, Role},
    config::{self, Config},
    metrics::{MetricsEndpoint, MetricsRegistry},
    registry::UserRegistry,
    server::{RequestHandler, ServerBuilder},
};

const DEFAULT_CONFIG_PATH: &str = "config.yaml";

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("user_services=debug".parse()?)
                .add_directive("hyper=info".parse()?),
        )
        .init();

    let mut args = std::env::args().skip(1);
    let role: Role = args
        .next()
        .context("usage: user-services <back|front> [config-file]")?
        .parse()?;

    let config = load(args.next()).await?;

    // Initialize metrics
    let metrics_registry = Arc::new(MetricsRegistry::new()?);
    let metrics = metrics_registry.collector();

    if config.metrics.enabled {
        let metrics_addr: SocketAddr = ([0, 0, 0, 0], config.metrics.port).into();
        start_metrics_server(metrics_addr, metrics_registry, config.metrics.path.clone()).await?;
    }

    let server = match role {
        Role::Back => {
            info!("Starting user registry on {}", config.back.listen);
            app::bind_back(config.back.listen, UserRegistry::new(), Some(metrics)).await?
        }
        Role::Front => {
            info!("Starting user proxy on {}", config.front.listen);
            let remote = config.front.remote_service_url()?;
            app::bind_front(config.front.listen, remote, Some(metrics)).await?
        }
    };

    server.serve_with_shutdown(shutdown_signal()).await?;
    info!("Shutdown complete");
    Ok(())
}

async fn load(path: Option<String>) -> Result<Config> {
    match path {
        Some(path) => {
            info!("Loading configuration from: {}", path);
            config::load_config(&path).await
        }
        None if Path::new(DEFAULT_CONFIG_PATH).exists() => {
            info!("Loading configuration from: {}", DEFAULT_CONFIG_PATH);
            config::load_config(DEFAULT_CONFIG_PATH).await
        }
        None => {
            info!("No configuration file, using defaults");
            config::default_config()
        }
    }
}

async fn start_metrics_server(
    addr: SocketAddr,
    registry: Arc<MetricsRegistry>,
    path: String,
) -> Result<()> {
    info!("Metrics server listening on http://{}{}", addr, path);

    let endpoint = MetricsEndpoint::new(registry, path);
    let server = ServerBuilder::new(addr)
        .with_handler(RequestHandler::new(Arc::new(endpoint)))
        .bind()
        .await?;

    tokio::spawn(async move {
        if let Err(e) = server.serve_with_shutdown(std::future::pending()).await {
            error!("Metrics server error: {}", e);
        }
    });

    Ok(())
}

// Graceful shutdown handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!("Failed to install signal handler: {}", e);
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

    info!("Shutdown signal received");
}
