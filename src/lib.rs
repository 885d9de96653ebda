// src/lib.rs
pub mod app;
pub mod client;
pub mod config;
pub mod metrics;
pub mod model;
pub mod proxy;
pub mod registry;
pub mod server;
