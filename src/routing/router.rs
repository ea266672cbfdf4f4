//! Path classification.
//!
//! # Responsibilities
//! - Normalize the request path (strip leading slashes)
//! - Classify it into exactly one [`RouteDecision`]
//! - Percent-decode slugs
//!
//! # Design Decisions
//! - Pure function of the path: no config, no I/O
//! - Prefixes are checked before the general slug case, so no path can
//!   match two categories
//! - Total: malformed percent-encodings decode lossily instead of failing

use std::borrow::Cow;

/// Outcome of classifying a request path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteDecision {
    /// Landing page / health check.
    Health,
    /// Administrative panel gate.
    Admin,
    /// QR image passthrough for the slug.
    QrProxy(String),
    /// Short-link resolution for the slug.
    SlugLookup(String),
    /// Nothing to serve.
    NotFound,
}

impl RouteDecision {
    /// Low-cardinality label for logs and metrics.
    pub fn label(&self) -> &'static str {
        match self {
            RouteDecision::Health => "health",
            RouteDecision::Admin => "admin",
            RouteDecision::QrProxy(_) => "qr",
            RouteDecision::SlugLookup(_) => "slug",
            RouteDecision::NotFound => "not_found",
        }
    }
}

const QR_PREFIX: &str = "qr/";
const SHORT_PREFIX: &str = "s/";

/// Strip every leading slash from a raw request path.
pub fn normalize_path(raw: &str) -> &str {
    raw.trim_start_matches('/')
}

/// Classify a normalized path. First matching rule wins.
pub fn route(path: &str) -> RouteDecision {
    match path {
        "" | "health" => return RouteDecision::Health,
        "admin" => return RouteDecision::Admin,
        _ => {}
    }

    if let Some(rest) = path.strip_prefix(QR_PREFIX) {
        return RouteDecision::QrProxy(decode(rest).into_owned());
    }

    let raw_slug = path.strip_prefix(SHORT_PREFIX).unwrap_or(path);
    let slug = decode(raw_slug);

    if slug.is_empty() || slug == "favicon.ico" {
        RouteDecision::NotFound
    } else {
        RouteDecision::SlugLookup(slug.into_owned())
    }
}

fn decode(raw: &str) -> Cow<'_, str> {
    match urlencoding::decode_binary(raw.as_bytes()) {
        Cow::Borrowed(bytes) => String::from_utf8_lossy(bytes),
        Cow::Owned(bytes) => Cow::Owned(String::from_utf8_lossy(&bytes).into_owned()),
    }
}
