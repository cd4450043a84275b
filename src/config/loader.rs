//! Configuration loading from disk and the process environment.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::{ServiceConfig, ServiceKind};
use crate::config::validation::{validate_config, ValidationError};

/// Environment variable holding the inference API credential.
pub const API_TOKEN_ENV: &str = "HUGGINGFACE_API_TOKEN";

/// Environment variable overriding the inference model.
pub const MODEL_ID_ENV: &str = "MODEL_ID";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Values given on the command line, applied over the file and environment.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub service: Option<ServiceKind>,
    pub bind_address: Option<String>,
}

impl Overrides {
    fn apply(&self, config: &mut ServiceConfig) {
        if let Some(service) = self.service {
            config.service = service;
        }
        if let Some(bind) = &self.bind_address {
            config.listener.bind_address = bind.clone();
        }
    }
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<ServiceConfig, ConfigError> {
    load_with_overrides(Some(path), &Overrides::default())
}

/// Load from `path` when given, otherwise start from defaults.
///
/// Environment overrides and validation apply in both cases.
pub fn load_or_default(path: Option<&Path>) -> Result<ServiceConfig, ConfigError> {
    load_with_overrides(path, &Overrides::default())
}

/// Load, apply environment then command-line overrides, and validate the result.
pub fn load_with_overrides(
    path: Option<&Path>,
    overrides: &Overrides,
) -> Result<ServiceConfig, ConfigError> {
    let mut config: ServiceConfig = match path {
        Some(path) => toml::from_str(&fs::read_to_string(path)?)?,
        None => ServiceConfig::default(),
    };

    apply_env_overrides(&mut config, |key| std::env::var(key).ok());
    overrides.apply(&mut config);
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Apply the credential and model overrides from the environment.
///
/// Empty values are treated as unset.
pub fn apply_env_overrides<F>(config: &mut ServiceConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    if let Some(token) = non_empty(API_TOKEN_ENV) {
        config.chat.api_token = Some(token);
    }
    if let Some(model) = non_empty(MODEL_ID_ENV) {
        config.chat.model = model;
    }
}
