// src/config/mod.rs
mod models;

pub use models::*;

use anyhow::{Context, Result};
use std::path::Path;

/// Prefix for environment overrides, e.g. `USER_SERVICES__FRONT__REMOTE_SERVICE_URL`.
pub const ENV_PREFIX: &str = "USER_SERVICES";

/// Load configuration from a file (YAML or JSON), then apply environment overrides.
pub async fn load_config<P: AsRef<Path>>(path: P) -> Result<Config> {
    let path = path.as_ref();
    let contents = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read config file {}", path.display()))?;

    let config: Config = if matches!(
        path.extension().and_then(|s| s.to_str()),
        Some("yaml") | Some("yml")
    ) {
        serde_yaml::from_str(&contents).context("Failed to parse YAML config")?
    } else {
        serde_json::from_str(&contents).context("Failed to parse JSON config")?
    };

    finish(config)
}

/// Built-in defaults with environment overrides, for running without a file.
pub fn default_config() -> Result<Config> {
    finish(Config::default())
}

fn finish(base: Config) -> Result<Config> {
    let config = apply_env_overrides(&base)?;
    config.validate()?;
    Ok(config)
}

fn apply_env_overrides(base: &Config) -> Result<Config> {
    ::config::Config::builder()
        .add_source(::config::Config::try_from(base).context("Failed to layer base config")?)
        .add_source(
            ::config::Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true),
        )
        .build()
        .context("Failed to read environment overrides")?
        .try_deserialize()
        .context("Invalid configuration after environment overrides")
}
