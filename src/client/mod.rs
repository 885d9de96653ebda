// src/client/mod.rs
mod error;
mod registry_client;

pub use error::ClientError;
pub use registry_client::{RegistryClient, RemoteUserClient, CONNECT_TIMEOUT, READ_TIMEOUT};
