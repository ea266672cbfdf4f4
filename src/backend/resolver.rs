//! Two-phase slug resolution.
//!
//! # Flow
//! ```text
//! Phase 1: GET ?resolve=<slug>
//!     ├─ "NOT_FOUND"            → NotFound (Phase 2 skipped)
//!     ├─ trusted URL            → Redirect
//!     └─ error / non-2xx /
//!        untrusted body         → Phase 2
//! Phase 2: GET ?s=<slug>        → Passthrough (relayed verbatim)
//! ```
//!
//! # Design Decisions
//! - Phase 1 failures never surface to the client; they only select Phase 2
//! - A failed trust check and a network failure take the same path
//! - Calls are strictly sequential, at most two per lookup

use reqwest::Response;

use crate::backend::client::{read_bounded_text, BackendClient};
use crate::backend::trust::RedirectTarget;
use crate::error::EdgeError;
use crate::http::request::TraceContext;
use crate::observability::metrics;

/// Sentinel the backend answers for unknown slugs.
pub const NOT_FOUND_SENTINEL: &str = "NOT_FOUND";

/// Resolution outcome recorded when the Phase 2 call itself fails.
pub const OUTCOME_UPSTREAM_ERROR: &str = "upstream_error";

/// Final classification of a slug lookup.
#[derive(Debug)]
pub enum LookupResult {
    /// Phase 1 produced a trusted target.
    Redirect(RedirectTarget),
    /// The backend does not know the slug.
    NotFound,
    /// Raw Phase 2 response, to be relayed with caching disabled.
    Passthrough(Response),
}

impl LookupResult {
    pub fn label(&self) -> &'static str {
        match self {
            LookupResult::Redirect(_) => "redirect",
            LookupResult::NotFound => "not_found",
            LookupResult::Passthrough(_) => "passthrough",
        }
    }
}

/// What Phase 1 had to say.
#[derive(Debug)]
enum FastAnswer {
    Target(RedirectTarget),
    NotFound,
    NoAnswer(NoAnswer),
}

/// Why Phase 1 produced nothing usable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NoAnswer {
    Unavailable,
    BadStatus,
    Untrusted,
}

impl NoAnswer {
    fn as_str(self) -> &'static str {
        match self {
            NoAnswer::Unavailable => "unavailable",
            NoAnswer::BadStatus => "bad_status",
            NoAnswer::Untrusted => "untrusted",
        }
    }
}

/// Resolve a slug against the backend.
///
/// Only a failure of the Phase 2 call itself is returned as an error.
pub async fn resolve(
    backend: &BackendClient,
    slug: &str,
    trace: &TraceContext,
) -> Result<LookupResult, EdgeError> {
    let result = match fast_lookup(backend, slug, trace).await {
        FastAnswer::Target(target) => {
            tracing::debug!(slug = %slug, target = %target.as_str(), "Resolved slug");
            LookupResult::Redirect(target)
        }
        FastAnswer::NotFound => {
            tracing::debug!(slug = %slug, "Backend reported unknown slug");
            LookupResult::NotFound
        }
        FastAnswer::NoAnswer(reason) => {
            tracing::info!(slug = %slug, reason = reason.as_str(), "Falling back to backend page");
            let page = backend.page(slug, trace).await.map_err(|e| {
                tracing::error!(slug = %slug, error = %e, "Fallback page request failed");
                metrics::record_resolution(OUTCOME_UPSTREAM_ERROR);
                EdgeError::Upstream(e)
            })?;
            LookupResult::Passthrough(page)
        }
    };

    metrics::record_resolution(result.label());
    Ok(result)
}

async fn fast_lookup(backend: &BackendClient, slug: &str, trace: &TraceContext) -> FastAnswer {
    let response = match backend.resolve(slug, trace).await {
        Ok(r) => r,
        Err(e) => {
            tracing::warn!(slug = %slug, error = %e, "Resolve request failed");
            return FastAnswer::NoAnswer(NoAnswer::Unavailable);
        }
    };

    let status = response.status();
    if !status.is_success() {
        tracing::warn!(slug = %slug, status = %status, "Resolve returned non-success status");
        return FastAnswer::NoAnswer(NoAnswer::BadStatus);
    }

    let body = match read_bounded_text(response, backend.max_resolve_body_bytes()).await {
        Ok(Some(body)) => body,
        Ok(None) => return FastAnswer::NoAnswer(NoAnswer::Untrusted),
        Err(e) => {
            tracing::warn!(slug = %slug, error = %e, "Reading resolve body failed");
            return FastAnswer::NoAnswer(NoAnswer::Unavailable);
        }
    };

    classify(&body)
}

/// Map a Phase 1 body to an answer.
fn classify(body: &str) -> FastAnswer {
    let answer = body.trim();
    if answer == NOT_FOUND_SENTINEL {
        return FastAnswer::NotFound;
    }
    match RedirectTarget::parse(answer) {
        Some(target) => FastAnswer::Target(target),
        None => FastAnswer::NoAnswer(NoAnswer::Untrusted),
    }
}
