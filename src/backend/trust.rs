//! Trust validation for backend-supplied redirect targets.
//!
//! The backend is semi-trusted: its answer is only ever placed in a
//! `Location` header after it passes [`is_trusted_url`] and is a legal
//! header value.

use axum::http::HeaderValue;

/// A string is trusted when it starts with `http://` or `https://`
/// (case-insensitive) and carries no whitespace, `<` or `>`.
pub fn is_trusted_url(candidate: &str) -> bool {
    has_http_scheme(candidate)
        && !candidate
            .chars()
            .any(|c| c.is_whitespace() || c == '<' || c == '>')
}

fn has_http_scheme(candidate: &str) -> bool {
    ["http://", "https://"].iter().any(|scheme| {
        candidate
            .get(..scheme.len())
            .is_some_and(|head| head.eq_ignore_ascii_case(scheme))
    })
}

/// A redirect target that passed trust validation and is safe to emit as
/// a `Location` header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedirectTarget(HeaderValue);

impl RedirectTarget {
    /// Returns `None` for untrusted strings and for strings that are not
    /// plain ASCII header values (e.g. raw UTF-8 or control characters).
    pub fn parse(candidate: &str) -> Option<Self> {
        if !is_trusted_url(candidate) || !candidate.is_ascii() {
            return None;
        }
        HeaderValue::from_str(candidate).ok().map(Self)
    }

    pub fn as_str(&self) -> &str {
        self.0.to_str().unwrap_or_default()
    }

    pub fn header_value(&self) -> &HeaderValue {
        &self.0
    }
}
