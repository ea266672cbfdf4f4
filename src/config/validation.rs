//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, addresses parse)
//! - Flag half-configured credentials
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - A missing backend base URL is not a startup error: every route answers
//!   500 instead, so the process stays observable
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use thiserror::Error;
use url::Url;

use crate::config::schema::EdgeConfig;

/// A single semantic problem with the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("invalid bind address '{0}'")]
    BindAddress(String),
    #[error("backend base URL '{0}' is not an absolute http(s) URL")]
    BackendUrl(String),
    #[error("request timeout must be greater than zero")]
    RequestTimeout,
    #[error("invalid metrics address '{0}'")]
    MetricsAddress(String),
}

/// Validate the configuration, collecting every error.
pub fn validate_config(config: &EdgeConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::BindAddress(
            config.listener.bind_address.clone(),
        ));
    }

    if let Some(base) = &config.backend.base_url {
        let valid = Url::parse(base)
            .map(|url| matches!(url.scheme(), "http" | "https") && url.has_host())
            .unwrap_or(false);
        if !valid {
            errors.push(ValidationError::BackendUrl(base.clone()));
        }
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::RequestTimeout);
    }

    if config.observability.metrics_enabled
        && config
            .observability
            .metrics_address
            .parse::<SocketAddr>()
            .is_err()
    {
        errors.push(ValidationError::MetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Non-fatal observations worth logging at startup.
pub fn config_warnings(config: &EdgeConfig) -> Vec<String> {
    let mut warnings = Vec::new();

    if config.backend.base_url.is_none() {
        warnings.push("GAS_BASE is not set; every route will answer 500".to_string());
    }

    match (&config.admin.user, &config.admin.secret) {
        (Some(_), None) | (None, Some(_)) => warnings.push(
            "only one of ADMIN_USER / ADMIN_SECRET is set; /admin Basic-Auth is disabled"
                .to_string(),
        ),
        (None, None) => {
            warnings.push("ADMIN_USER / ADMIN_SECRET not set; /admin is open".to_string())
        }
        (Some(_), Some(_)) => {}
    }

    warnings
}
