//! Configuration loading from disk and the process environment.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::EdgeConfig;
use crate::config::validation::{validate_config, ValidationError};

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

/// Environment variables recognised as overrides.
pub const ENV_BACKEND_BASE: &str = "GAS_BASE";
pub const ENV_ADMIN_PASS: &str = "ADMIN_PASS";
pub const ENV_ADMIN_USER: &str = "ADMIN_USER";
pub const ENV_ADMIN_SECRET: &str = "ADMIN_SECRET";
pub const ENV_BIND_ADDRESS: &str = "BIND_ADDRESS";
pub const ENV_LOG_LEVEL: &str = "LOG_LEVEL";

/// Load configuration: optional TOML file, then environment overrides, then
/// normalization and validation.
pub fn load_config(path: Option<&Path>) -> Result<EdgeConfig, ConfigError> {
    let mut config = match path {
        Some(path) => {
            let content = fs::read_to_string(path)?;
            toml::from_str(&content)?
        }
        None => EdgeConfig::default(),
    };

    apply_env_overrides(&mut config, |key| std::env::var(key).ok());
    normalize(&mut config);

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Overlay environment values onto the config. Empty values count as unset.
pub fn apply_env_overrides<F>(config: &mut EdgeConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    if let Some(base) = get(ENV_BACKEND_BASE) {
        config.backend.base_url = Some(base);
    }
    if let Some(pass) = get(ENV_ADMIN_PASS) {
        config.admin.backend_pass = Some(pass);
    }
    if let Some(user) = get(ENV_ADMIN_USER) {
        config.admin.user = Some(user);
    }
    if let Some(secret) = get(ENV_ADMIN_SECRET) {
        config.admin.secret = Some(secret);
    }
    if let Some(bind) = get(ENV_BIND_ADDRESS) {
        config.listener.bind_address = bind;
    }
    if let Some(level) = get(ENV_LOG_LEVEL) {
        config.observability.log_level = level;
    }
}

/// Strip trailing slashes from the base URL and collapse empty strings to `None`.
pub fn normalize(config: &mut EdgeConfig) {
    config.backend.base_url = config
        .backend
        .base_url
        .take()
        .map(|base| base.trim().trim_end_matches('/').to_string())
        .filter(|base| !base.is_empty());

    for field in [
        &mut config.admin.user,
        &mut config.admin.secret,
        &mut config.admin.backend_pass,
    ] {
        if field.as_deref().is_some_and(str::is_empty) {
            *field = None;
        }
    }
}
