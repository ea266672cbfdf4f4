//! Admin panel gate.
//!
//! The panel HTML is fetched server-side with `ADMIN_PASS` and relayed, so
//! the panel secret never reaches the browser.

use axum::{http::HeaderMap, response::Response};

use crate::backend::BackendClient;
use crate::error::EdgeError;
use crate::http::request::TraceContext;
use crate::http::response::{no_store, relay};
use crate::http::server::AppState;

/// Authenticate, then relay the backend admin panel.
pub async fn admin_panel(
    state: &AppState,
    backend: &BackendClient,
    headers: &HeaderMap,
    trace: &TraceContext,
) -> Result<Response, EdgeError> {
    if !state.admin_auth.check(headers) {
        return Err(EdgeError::Unauthorized {
            realm: state.config.admin.realm.clone(),
        });
    }

    let pass = state
        .config
        .admin
        .backend_pass
        .as_deref()
        .ok_or(EdgeError::MissingAdminPass)?;

    let upstream = backend.admin_panel(pass, trace).await?;
    Ok(no_store(relay(upstream)))
}
