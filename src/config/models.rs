// src/config/models.rs
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use url::Url;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("remote_service_url `{0}` is not a valid url: {1}")]
    InvalidUrl(String, url::ParseError),

    #[error("remote_service_url must use http or https, got `{0}`")]
    UnsupportedScheme(String),

    #[error("remote_service_url `{0}` has no host")]
    MissingHost(Url),

    #[error("metrics path must start with '/', got `{0}`")]
    InvalidMetricsPath(String),

    #[error("metrics port {0} collides with a service listener")]
    PortCollision(u16),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub back: BackConfig,
    #[serde(default)]
    pub front: FrontConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
}

/// Registry (back) service settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackConfig {
    #[serde(default = "default_back_listen")]
    pub listen: SocketAddr,
}

/// Proxy (front) service settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrontConfig {
    #[serde(default = "default_front_listen")]
    pub listen: SocketAddr,
    /// Base URL of the registry the proxy forwards to.
    #[serde(default = "default_remote_service_url")]
    pub remote_service_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_metrics_port")]
    pub port: u16,
    #[serde(default = "default_metrics_path")]
    pub path: String,
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = self.front.remote_service_url()?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::UnsupportedScheme(url.scheme().to_string()));
        }
        if url.host_str().is_none() {
            return Err(ConfigError::MissingHost(url));
        }

        if !self.metrics.path.starts_with('/') {
            return Err(ConfigError::InvalidMetricsPath(self.metrics.path.clone()));
        }
        if self.metrics.enabled
            && (self.metrics.port == self.back.listen.port()
                || self.metrics.port == self.front.listen.port())
        {
            return Err(ConfigError::PortCollision(self.metrics.port));
        }

        Ok(())
    }
}

impl FrontConfig {
    pub fn remote_service_url(&self) -> Result<Url, ConfigError> {
        Url::parse(&self.remote_service_url)
            .map_err(|e| ConfigError::InvalidUrl(self.remote_service_url.clone(), e))
    }
}

impl Default for BackConfig {
    fn default() -> Self {
        Self {
            listen: default_back_listen(),
        }
    }
}

impl Default for FrontConfig {
    fn default() -> Self {
        Self {
            listen: default_front_listen(),
            remote_service_url: default_remote_service_url(),
        }
    }
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            port: default_metrics_port(),
            path: default_metrics_path(),
        }
    }
}

fn default_back_listen() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 8081))
}

fn default_front_listen() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 8080))
}

fn default_remote_service_url() -> String {
    "http://127.0.0.1:8081".to_string()
}

fn default_metrics_port() -> u16 {
    9090
}

fn default_metrics_path() -> String {
    "/metrics".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn rejects_non_http_remote() {
        let mut config = Config::default();
        config.front.remote_service_url = "ftp://registry:21".to_string();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::UnsupportedScheme(scheme)) if scheme == "ftp"
        ));
    }

    #[test]
    fn rejects_unparseable_remote() {
        let mut config = Config::default();
        config.front.remote_service_url = "not a url".to_string();
        assert!(matches!(config.validate(), Err(ConfigError::InvalidUrl(..))));
    }

    #[test]
    fn rejects_metrics_port_on_listener() {
        let mut config = Config::default();
        config.metrics.enabled = true;
        config.metrics.port = 8080;
        assert!(matches!(config.validate(), Err(ConfigError::PortCollision(8080))));
    }

    #[test]
    fn partial_yaml_fills_defaults() {
        let config: Config = serde_yaml::from_str(
            "front:\n  remote_service_url: http://registry.local:9000\n",
        )
        .unwrap();
        assert_eq!(config.front.listen.port(), 8080);
        assert_eq!(config.back.listen.port(), 8081);
        assert_eq!(
            config.front.remote_service_url().unwrap().host_str(),
            Some("registry.local")
        );
    }
}
