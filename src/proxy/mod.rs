// src/proxy/mod.rs
mod api;
mod error;
mod service;

pub use api::{ProxyApi, CLIENT_USERS_PATH};
pub use error::{map_failure, ProxyError};
pub use service::UserProxyService;
