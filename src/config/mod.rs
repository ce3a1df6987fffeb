pub mod loader;
pub mod models;
pub mod validation;

pub use loader::{execution_environment, load_config, resolve_config};
pub use models::AppConfig;
pub use validation::{AppConfigValidator, ValidationError, ValidationResult};
