// src/client/error.rs
use reqwest::StatusCode;

/// Failure of a call from the proxy to the registry.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("registry responded with {status}")]
    Status { status: StatusCode, body: String },

    #[error("request to registry failed: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("undecodable registry response: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("invalid registry url: {0}")]
    Url(#[from] url::ParseError),
}

impl ClientError {
    /// Upstream HTTP status, when the registry answered at all.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ClientError::Status { status, .. } => Some(*status),
            ClientError::Transport(e) => e.status(),
            ClientError::Decode(_) | ClientError::Url(_) => None,
        }
    }
}
