pub mod builder;
pub mod handler;
pub mod listener;
pub mod response;
pub mod routing;

pub use builder::{BoundServer, ServerBuilder};
pub use handler::{HttpApp, RequestHandler, REQUEST_ID_HEADER};
pub use routing::{match_resource, Resource};
