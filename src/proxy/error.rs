// src/proxy/error.rs
use hyper::{Body, Response, StatusCode};

use crate::client::ClientError;
use crate::server::response;

#[derive(Debug, thiserror::Error)]
pub enum ProxyError {
    #[error("registry call failed: {0}")]
    Upstream(#[from] ClientError),

    #[error("rejected request: {0}")]
    BadRequest(String),
}

impl ProxyError {
    /// The status the failure is classified by: the registry's for upstream
    /// failures, 400 for requests the proxy itself could not parse.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ProxyError::Upstream(e) => e.status(),
            ProxyError::BadRequest(_) => Some(StatusCode::BAD_REQUEST),
        }
    }
}

/// Maps a failure's status to the proxy's response. Upstream bodies are never forwarded.
pub fn map_failure(status: Option<StatusCode>) -> (StatusCode, &'static str) {
    match status {
        Some(StatusCode::NOT_FOUND) => (StatusCode::NOT_FOUND, "Resource not found"),
        Some(StatusCode::BAD_REQUEST) => (StatusCode::BAD_REQUEST, "Bad request"),
        _ => (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error"),
    }
}

impl From<ProxyError> for Response<Body> {
    fn from(err: ProxyError) -> Self {
        let (status, message) = map_failure(err.status());
        response::text(status, message)
    }
}
