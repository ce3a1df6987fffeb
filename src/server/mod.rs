pub mod middleware;
pub mod routing;
pub mod routing_key;

pub use routing::{RoutingServer, ServerError, ServerHandle};
pub use routing_key::{RoutingKey, RoutingKeyError};
