//! Request-level errors and their HTTP mapping.

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// Errors that end a request early.
///
/// Phase 1 backend failures are not represented here: the resolver recovers
/// from them locally.
#[derive(Debug, Error)]
pub enum EdgeError {
    /// `GAS_BASE` is not configured.
    #[error("GAS_BASE missing")]
    MissingBackend,

    /// `ADMIN_PASS` is not configured.
    #[error("ADMIN_PASS not configured")]
    MissingAdminPass,

    /// Admin credentials absent or wrong.
    #[error("Authentication required")]
    Unauthorized { realm: String },

    /// A passthrough call could not reach the backend.
    #[error("Upstream request failed: {0}")]
    Upstream(#[from] reqwest::Error),
}

impl EdgeError {
    pub fn status(&self) -> StatusCode {
        match self {
            EdgeError::MissingBackend => StatusCode::INTERNAL_SERVER_ERROR,
            EdgeError::MissingAdminPass => StatusCode::FORBIDDEN,
            EdgeError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            EdgeError::Upstream(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for EdgeError {
    fn into_response(self) -> Response {
        let status = self.status();
        match self {
            EdgeError::Unauthorized { realm } => {
                let challenge = HeaderValue::from_str(&format!("Basic realm=\"{}\"", realm))
                    .unwrap_or_else(|_| HeaderValue::from_static("Basic realm=\"admin\""));
                (
                    status,
                    [(header::WWW_AUTHENTICATE, challenge)],
                    "Authentication required",
                )
                    .into_response()
            }
            // Transport details stay in the logs.
            EdgeError::Upstream(_) => (status, "Upstream request failed").into_response(),
            other => (status, other.to_string()).into_response(),
        }
    }
}
