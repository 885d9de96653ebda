// src/metrics/endpoint.rs
use async_trait::async_trait;
use hyper::header::{HeaderValue, CONTENT_TYPE};
use hyper::{Body, Request, Response, StatusCode};
use std::sync::Arc;

use super::MetricsRegistry;
use crate::server::{response, HttpApp};

/// Serves the Prometheus text exposition on a single path.
pub struct MetricsEndpoint {
    registry: Arc<MetricsRegistry>,
    path: String,
}

impl MetricsEndpoint {
    pub fn new(registry: Arc<MetricsRegistry>, path: String) -> Self {
        Self { registry, path }
    }
}

#[async_trait]
impl HttpApp for MetricsEndpoint {
    async fn handle(&self, req: Request<Body>) -> Response<Body> {
        if req.uri().path() != self.path {
            return response::not_found();
        }

        match self.registry.gather() {
            Ok(metrics) => {
                let mut res = Response::new(Body::from(metrics));
                res.headers_mut().insert(
                    CONTENT_TYPE,
                    HeaderValue::from_static("text/plain; version=0.0.4"),
                );
                res
            }
            Err(e) => {
                tracing::error!(%e, "failed to encode metrics");
                response::text(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        }
    }

    fn name(&self) -> &'static str {
        "metrics"
    }
}
