// src/client/registry_client.rs
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::{Client, Method};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

use super::ClientError;
use crate::metrics::{MetricsCollector, Timer};
use crate::model::User;

pub const CONNECT_TIMEOUT: Duration = Duration::from_millis(5000);
pub const READ_TIMEOUT: Duration = Duration::from_millis(10000);

const USERS_PATH: &str = "/api/users";

/// Typed operations the proxy needs from the registry.
#[async_trait]
pub trait RemoteUserClient: Send + Sync {
    async fn get_user_by_id(&self, id: i64) -> Result<User, ClientError>;

    async fn create_user(&self, user: &User) -> Result<User, ClientError>;

    async fn list_users(&self) -> Result<Vec<User>, ClientError>;
}

/// reqwest-backed binding to the registry's `/api/users` endpoints.
///
/// Built once at startup; every call uses the fixed connect and read timeouts
/// and logs the full request and response at `debug`.
pub struct RegistryClient {
    client: Client,
    base_url: Url,
    metrics: Option<Arc<MetricsCollector>>,
}

impl RegistryClient {
    pub fn new(base_url: Url) -> Result<Self, ClientError> {
        Self::with_timeouts(base_url, CONNECT_TIMEOUT, READ_TIMEOUT)
    }

    pub(crate) fn with_timeouts(
        base_url: Url,
        connect: Duration,
        read: Duration,
    ) -> Result<Self, ClientError> {
        let client = Client::builder()
            .connect_timeout(connect)
            .timeout(read)
            .build()
            .map_err(ClientError::Transport)?;

        Ok(Self {
            client,
            base_url,
            metrics: None,
        })
    }

    pub fn with_metrics(mut self, metrics: Arc<MetricsCollector>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    // Appends to the base URL rather than `Url::join`, so a base with a path prefix keeps it.
    fn endpoint(&self, path: &str) -> Result<Url, ClientError> {
        let base = self.base_url.as_str().trim_end_matches('/');
        Ok(Url::parse(&format!("{base}{path}"))?)
    }

    fn request(&self, method: Method, url: Url) -> reqwest::RequestBuilder {
        self.client
            .request(method, url)
            .header(ACCEPT, HeaderValue::from_static("application/json"))
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        builder: reqwest::RequestBuilder,
    ) -> Result<T, ClientError> {
        let request = builder.build().map_err(ClientError::Transport)?;
        let request_body = request
            .body()
            .and_then(|b| b.as_bytes())
            .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
            .unwrap_or_default();
        debug!(
            operation,
            method = %request.method(),
            url = %request.url(),
            headers = %format_headers(request.headers()),
            body = %request_body,
            "---> registry request"
        );

        let timer = Timer::new();
        let result = self.send(request).await.and_then(|(status, body)| {
            if !status.is_success() {
                return Err(ClientError::Status {
                    status,
                    body: String::from_utf8_lossy(&body).into_owned(),
                });
            }
            serde_json::from_slice(&body).map_err(ClientError::Decode)
        });
        let elapsed = timer.elapsed();

        if let Some(metrics) = &self.metrics {
            metrics.record_upstream_request(operation, result.is_ok(), elapsed);
        }

        if let Err(e) = &result {
            match e.status() {
                Some(status) => {
                    warn!(operation, %status, ?elapsed, "<--- registry returned an error status")
                }
                None => warn!(operation, %e, ?elapsed, "<--- registry call failed"),
            }
        }
        result
    }

    async fn send(&self, request: reqwest::Request) -> Result<(reqwest::StatusCode, Vec<u8>), ClientError> {
        let response = self
            .client
            .execute(request)
            .await
            .map_err(ClientError::Transport)?;

        let status = response.status();
        let headers = format_headers(response.headers());
        let body = response.bytes().await.map_err(ClientError::Transport)?;

        debug!(
            %status,
            headers = %headers,
            body = %String::from_utf8_lossy(&body),
            "<--- registry response"
        );
        Ok((status, body.to_vec()))
    }
}

#[async_trait]
impl RemoteUserClient for RegistryClient {
    async fn get_user_by_id(&self, id: i64) -> Result<User, ClientError> {
        let url = self.endpoint(&format!("{USERS_PATH}/{id}"))?;
        self.execute("get_user", self.request(Method::GET, url)).await
    }

    async fn create_user(&self, user: &User) -> Result<User, ClientError> {
        let url = self.endpoint(USERS_PATH)?;
        self.execute("create_user", self.request(Method::POST, url).json(user))
            .await
    }

    async fn list_users(&self) -> Result<Vec<User>, ClientError> {
        let url = self.endpoint(USERS_PATH)?;
        self.execute("list_users", self.request(Method::GET, url)).await
    }
}

fn format_headers(headers: &HeaderMap) -> String {
    headers
        .iter()
        .map(|(name, value)| format!("{}: {}", name, value.to_str().unwrap_or("<binary>")))
        .collect::<Vec<_>>()
        .join(", ")
}
