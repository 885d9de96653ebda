// src/server/handler.rs
use async_trait::async_trait;
use hyper::header::HeaderValue;
use hyper::{Body, Request, Response};
use std::convert::Infallible;
use std::sync::Arc;
use tower::Service;
use tracing::Instrument;
use uuid::Uuid;

use crate::metrics::{MetricsCollector, Timer};

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// One HTTP-facing application (registry, proxy, metrics endpoint).
///
/// Implementations turn every failure into a response themselves, so the
/// connection layer never sees an error.
#[async_trait]
pub trait HttpApp: Send + Sync + 'static {
    async fn handle(&self, req: Request<Body>) -> Response<Body>;

    /// Label used in logs and metrics.
    fn name(&self) -> &'static str;
}

#[derive(Clone)]
pub struct RequestHandler {
    app: Arc<dyn HttpApp>,
    metrics: Option<Arc<MetricsCollector>>,
}

impl RequestHandler {
    pub fn new(app: Arc<dyn HttpApp>) -> Self {
        Self { app, metrics: None }
    }

    pub fn with_metrics(mut self, metrics: Arc<MetricsCollector>) -> Self {
        self.metrics = Some(metrics);
        self
    }
}

impl Service<Request<Body>> for RequestHandler {
    type Response = Response<Body>;
    type Error = Infallible;
    type Future = futures::future::BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &mut self,
        _cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        std::task::Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let app = self.app.clone();
        let metrics = self.metrics.clone();

        Box::pin(async move {
            let request_id = Uuid::new_v4().to_string();
            let method = req.method().clone();
            let span = tracing::info_span!(
                "request",
                service = app.name(),
                request_id = %request_id,
                method = %method,
                path = %req.uri().path(),
            );

            let timer = Timer::new();
            let mut response = app.handle(req).instrument(span.clone()).await;
            let elapsed = timer.elapsed();

            if let Ok(value) = HeaderValue::from_str(&request_id) {
                response.headers_mut().insert(REQUEST_ID_HEADER, value);
            }
            if let Some(metrics) = &metrics {
                metrics.record_request(app.name(), method.as_str(), response.status().as_u16(), elapsed);
            }

            span.in_scope(|| {
                tracing::info!(status = response.status().as_u16(), ?elapsed, "request completed");
            });
            Ok(response)
        })
    }
}
