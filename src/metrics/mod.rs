mod collector;
mod endpoint;

pub use collector::{MetricsCollector, MetricsRegistry, Timer};
pub use endpoint::MetricsEndpoint;
