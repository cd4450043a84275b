//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, page sizes, sampling parameters)
//! - Validate addresses, origins and URLs before anything binds or connects
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ServiceConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use axum::http::HeaderValue;

use crate::config::schema::ServiceConfig;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// A single semantic problem with the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path of the offending key.
    pub field: String,
    pub message: String,
}

impl ValidationError {
    fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Check every section and collect all problems.
pub fn validate_config(config: &ServiceConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "listener.bind_address",
            format!("'{}' is not a socket address", config.listener.bind_address),
        ));
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::new("timeouts.request_secs", "must be greater than 0"));
    }

    if config.security.max_body_size == 0 {
        errors.push(ValidationError::new("security.max_body_size", "must be greater than 0"));
    }

    let obs = &config.observability;
    if !LOG_LEVELS.contains(&obs.log_level.to_ascii_lowercase().as_str()) {
        errors.push(ValidationError::new(
            "observability.log_level",
            format!("unknown level '{}'", obs.log_level),
        ));
    }
    if obs.metrics_enabled && obs.metrics_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            format!("'{}' is not a socket address", obs.metrics_address),
        ));
    }

    if config.cors.enabled {
        for origin in &config.cors.allowed_origins {
            if origin == "*" {
                errors.push(ValidationError::new(
                    "cors.allowed_origins",
                    "wildcard origin cannot be combined with credentials",
                ));
            } else if HeaderValue::from_str(origin).is_err() {
                errors.push(ValidationError::new(
                    "cors.allowed_origins",
                    format!("'{}' is not a valid origin", origin),
                ));
            }
        }
    }

    let users = &config.users;
    if users.max_page_size == 0 {
        errors.push(ValidationError::new("users.max_page_size", "must be greater than 0"));
    }
    if users.default_page_size == 0 || users.default_page_size > users.max_page_size {
        errors.push(ValidationError::new(
            "users.default_page_size",
            format!("must be between 1 and {}", users.max_page_size),
        ));
    }

    validate_chat(config, &mut errors);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_chat(config: &ServiceConfig, errors: &mut Vec<ValidationError>) {
    let chat = &config.chat;

    match url::Url::parse(&chat.api_base) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => {}
        Ok(url) => errors.push(ValidationError::new(
            "chat.api_base",
            format!("unsupported scheme '{}'", url.scheme()),
        )),
        Err(e) => errors.push(ValidationError::new(
            "chat.api_base",
            format!("invalid URL '{}': {}", chat.api_base, e),
        )),
    }

    if chat.model.trim().is_empty() {
        errors.push(ValidationError::new("chat.model", "must not be empty"));
    }
    if chat.max_tokens == 0 {
        errors.push(ValidationError::new("chat.max_tokens", "must be greater than 0"));
    }
    if !(0.0..=2.0).contains(&chat.temperature) {
        errors.push(ValidationError::new("chat.temperature", "must be between 0.0 and 2.0"));
    }
    if chat.request_timeout_secs == 0 {
        errors.push(ValidationError::new("chat.request_timeout_secs", "must be greater than 0"));
    }
    if chat.status_message.is_empty() {
        errors.push(ValidationError::new("chat.status_message", "must not be empty"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&ServiceConfig::default()).is_ok());
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = ServiceConfig::default();
        config.timeouts.request_secs = 0;
        config.users.default_page_size = 500;
        config.chat.api_base = "ftp://example.com".to_string();
        config.chat.max_tokens = 0;

        let errors = validate_config(&config).unwrap_err();
        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(
            fields,
            vec![
                "timeouts.request_secs",
                "users.default_page_size",
                "chat.api_base",
                "chat.max_tokens",
            ]
        );
    }

    #[test]
    fn test_wildcard_origin_rejected() {
        let mut config = ServiceConfig::default();
        config.cors.allowed_origins = vec!["*".to_string()];
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors[0].field, "cors.allowed_origins");

        config.cors.enabled = false;
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_metrics_address_checked_only_when_enabled() {
        let mut config = ServiceConfig::default();
        config.observability.metrics_address = "nope".to_string();
        assert!(validate_config(&config).is_ok());

        config.observability.metrics_enabled = true;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_error_display() {
        let err = ValidationError::new("chat.model", "must not be empty");
        assert_eq!(err.to_string(), "chat.model: must not be empty");
    }
}
