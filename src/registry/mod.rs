// src/registry/mod.rs
mod api;
mod store;

pub use api::{RegistryApi, USERS_PATH};
pub use store::{RegistryError, UserRegistry};
