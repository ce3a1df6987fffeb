use crate::config::models::AppConfig;

/// Validation result type alias
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Validation error types
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Missing required field: {field}")]
    MissingField { field: String },

    #[error("Invalid field '{field}': {message}")]
    InvalidField { field: String, message: String },

    #[error("Validation failed: {message}")]
    ValidationFailed { message: String },
}

/// Application configuration validator.
///
/// Presence checks only: the database driver, database coordinates and the
/// message-broker coordinates must be non-empty after resolution. Whether
/// those services are reachable is the collaborators' concern.
pub struct AppConfigValidator;

impl AppConfigValidator {
    /// Validate the resolved configuration, reporting every missing field in
    /// one descriptive error.
    pub fn validate(config: &AppConfig) -> ValidationResult<()> {
        // Fields that must be non-empty after env / overlay / default
        // resolution.
        let required = [
            ("db_driver", &config.db_driver),
            ("db_host", &config.db_host),
            ("db_port", &config.db_port),
            ("db_user", &config.db_user),
            ("db_name", &config.db_name),
            ("web_server_port", &config.web_server_port),
            ("rabbitmq_host", &config.rabbitmq_host),
            ("rabbitmq_port", &config.rabbitmq_port),
        ];

        let errors: Vec<ValidationError> = required
            .into_iter()
            .filter(|(_, value)| value.is_empty())
            .map(|(field, _)| ValidationError::MissingField {
                field: field.to_string(),
            })
            .collect();

        if errors.is_empty() {
            Ok(())
        } else {
            let message = errors
                .iter()
                .map(|e| e.to_string())
                .collect::<Vec<_>>()
                .join("; ");
            Err(ValidationError::ValidationFailed { message })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete_config() -> AppConfig {
        AppConfig {
            db_driver: "mysql".to_string(),
            db_host: "localhost".to_string(),
            db_port: "3306".to_string(),
            db_user: "root".to_string(),
            db_name: "orders".to_string(),
            ..AppConfig::default()
        }
    }

    #[test]
    fn test_complete_config_passes() {
        assert!(AppConfigValidator::validate(&complete_config()).is_ok());
    }

    #[test]
    fn test_defaults_alone_are_incomplete() {
        let err = AppConfigValidator::validate(&AppConfig::default()).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("db_driver"));
        assert!(message.contains("db_host"));
        // Broker coordinates have defaults, so they are not reported.
        assert!(!message.contains("rabbitmq_host"));
    }

    #[test]
    fn test_missing_broker_host_is_reported() {
        let mut config = complete_config();
        config.rabbitmq_host.clear();
        let err = AppConfigValidator::validate(&config).unwrap_err();
        assert!(err.to_string().contains("rabbitmq_host"));
    }

    #[test]
    fn test_all_missing_fields_reported_together() {
        let mut config = complete_config();
        config.db_user.clear();
        config.db_name.clear();
        let message = AppConfigValidator::validate(&config)
            .unwrap_err()
            .to_string();
        assert!(message.contains("db_user"));
        assert!(message.contains("db_name"));
    }
}
