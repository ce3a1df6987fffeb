//! Configuration data structures for the bootstrap.
//!
//! These types map directly to environment variables and to KEY=VALUE overlay
//! files (also TOML / JSON / YAML). They are intentionally serde‑friendly and
//! include defaults so that minimal environments remain usable: only the
//! database and message-broker coordinates have no default and must be
//! provided by the deployment.
use serde::{Deserialize, Serialize};

/// Resolved application configuration.
///
/// Field names mirror the environment variables that feed them (`DB_DRIVER`
/// becomes `db_driver`, and so on). The database and RabbitMQ sections are
/// carried for collaborators that open those connections; this crate only
/// validates their presence and never connects anywhere itself.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct AppConfig {
    /// Database driver name (e.g. "mysql", "postgres"). Required.
    pub db_driver: String,
    /// Database host. Required.
    pub db_host: String,
    /// Database port. Required.
    pub db_port: String,
    /// Database user. Required.
    pub db_user: String,
    /// Database password. Optional, redacted from the startup summary.
    pub db_password: String,
    /// Database name. Required.
    pub db_name: String,

    /// Bind address for the HTTP routing server, `host:port` or `:port`.
    /// A bare port is normalized to `:port` by the loader.
    pub web_server_port: String,
    /// Port reserved for a gRPC collaborator.
    pub grpc_server_port: String,
    /// Port reserved for a GraphQL collaborator.
    pub graphql_server_port: String,

    /// RabbitMQ host. Required.
    pub rabbitmq_host: String,
    /// RabbitMQ port. Required.
    pub rabbitmq_port: String,
    pub rabbitmq_user: String,
    /// Optional, redacted from the startup summary.
    pub rabbitmq_password: String,
    pub rabbitmq_vhost: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            db_driver: String::new(),
            db_host: String::new(),
            db_port: String::new(),
            db_user: String::new(),
            db_password: String::new(),
            db_name: String::new(),
            web_server_port: ":8000".to_string(),
            grpc_server_port: "50051".to_string(),
            graphql_server_port: "8080".to_string(),
            rabbitmq_host: "rabbitmq".to_string(),
            rabbitmq_port: "5672".to_string(),
            rabbitmq_user: "guest".to_string(),
            rabbitmq_password: "guest".to_string(),
            rabbitmq_vhost: "/".to_string(),
        }
    }
}

impl AppConfig {
    /// Log a human-readable startup summary, with credentials redacted.
    pub fn log_summary(&self, environment: &str) {
        tracing::info!(
            environment,
            database = %format!(
                "{}@{}:{}/{}",
                self.db_user, self.db_host, self.db_port, self.db_name
            ),
            http = %self.web_server_port,
            grpc = %self.grpc_server_port,
            graphql = %self.graphql_server_port,
            "configuration resolved"
        );
        tracing::info!(
            host = %self.rabbitmq_host,
            port = %self.rabbitmq_port,
            vhost = %self.rabbitmq_vhost,
            user = %self.rabbitmq_user,
            "rabbitmq configuration resolved"
        );
    }
}
