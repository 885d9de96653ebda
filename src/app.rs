// src/app.rs
// Wiring of the two services onto the shared server plumbing.
use anyhow::{bail, Context, Result};
use std::net::SocketAddr;
use std::str::FromStr;
use std::sync::Arc;
use url::Url;

use crate::client::RegistryClient;
use crate::metrics::MetricsCollector;
use crate::proxy::{ProxyApi, UserProxyService};
use crate::registry::{RegistryApi, UserRegistry};
use crate::server::{BoundServer, RequestHandler, ServerBuilder};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// The user registry.
    Back,
    /// The proxy in front of the registry.
    Front,
}

impl FromStr for Role {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "back" => Ok(Role::Back),
            "front" => Ok(Role::Front),
            other => bail!("unknown role `{other}`, expected `back` or `front`"),
        }
    }
}

pub async fn bind_back(
    listen: SocketAddr,
    registry: UserRegistry,
    metrics: Option<Arc<MetricsCollector>>,
) -> Result<BoundServer<RequestHandler>> {
    let mut api = RegistryApi::new(registry);
    if let Some(metrics) = &metrics {
        api = api.with_metrics(metrics.clone());
    }

    serve_app(listen, Arc::new(api), metrics).await
}

pub async fn bind_front(
    listen: SocketAddr,
    remote_service_url: Url,
    metrics: Option<Arc<MetricsCollector>>,
) -> Result<BoundServer<RequestHandler>> {
    let mut client = RegistryClient::new(remote_service_url.clone())
        .context("Failed to build registry client")?;
    if let Some(metrics) = &metrics {
        client = client.with_metrics(metrics.clone());
    }
    tracing::info!("Forwarding to user registry at {}", remote_service_url);

    let api = ProxyApi::new(UserProxyService::new(Arc::new(client)));
    serve_app(listen, Arc::new(api), metrics).await
}

async fn serve_app(
    listen: SocketAddr,
    app: Arc<dyn crate::server::HttpApp>,
    metrics: Option<Arc<MetricsCollector>>,
) -> Result<BoundServer<RequestHandler>> {
    let mut handler = RequestHandler::new(app);
    if let Some(metrics) = metrics {
        handler = handler.with_metrics(metrics);
    }

    ServerBuilder::new(listen).with_handler(handler).bind().await
}
