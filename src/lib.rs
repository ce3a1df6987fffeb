//! Plinth - a minimal service bootstrap.
//!
//! Plinth provides the two pieces every small service starts with and nothing
//! more: an environment/file-driven configuration loader and a generic HTTP
//! routing server that collaborators register their handlers into before a
//! single start call begins serving.
//!
//! # Features
//! - Handler registration by bare path (any method) or (method, path) pair,
//!   reconciled into one route table with a documented precedence rule
//! - Registration-time validation of routing keys with typed errors
//! - Typed listen failures and graceful stop with a deadline, via a server
//!   handle instead of an unconditionally blocking call
//! - Configuration from environment variables with an optional development
//!   overlay file, built-in defaults and required-field validation
//! - Structured request logging via `tracing` (method, path, request id,
//!   status, latency)
//!
//! # Quick Example
//! ```no_run
//! use plinth::server::RoutingServer;
//!
//! # #[tokio::main] async fn main() -> eyre::Result<()> {
//! let config = plinth::config::load_config(".")?;
//! let mut server = RoutingServer::new(config.web_server_port.clone());
//! server.register("/health", || async { "ok" })?;
//! server.register_with_method("POST", "/orders", || async { "created" })?;
//! let handle = server.start().await?;
//! // ... later: handle.stop(std::time::Duration::from_secs(30)).await?;
//! # handle.stopped().await?;
//! # Ok(()) }
//! ```
//!
//! # Error Handling
//! Domain errors are dedicated `thiserror` types ([`server::ServerError`],
//! [`server::RoutingKeyError`], [`config::ValidationError`]); the application
//! boundary uses `eyre::Result` with context attached.
//!
//! # Non-goals
//! Database connectivity, message-queue connectivity and RPC/GraphQL servers
//! are external collaborators. The configuration carries their coordinates;
//! this crate never connects to them.
pub mod config;
pub mod server;
pub mod tracing_setup;
pub mod utils;

// Re-export the specific types needed by the binary crate
pub use crate::{
    config::{AppConfig, load_config},
    server::{RoutingKey, RoutingServer, ServerError, ServerHandle},
    utils::GracefulShutdown,
};
