//! Outbound client for the link-resolution backend.
//!
//! # Responsibilities
//! - Build endpoint URLs from the base URL and query contract
//! - Attach forwarded headers from the request's [`TraceContext`]
//! - Read the short resolve answer with a size bound
//!
//! # Query contract
//! - `?resolve=<slug>&ua&ref&ip&cc` → plain-text URL or `NOT_FOUND`
//! - `?s=<slug>&ua&ref&ip&cc` → HTML page with its own redirect
//! - `?qr=<slug>` → image
//! - `?admin=1&pass=<secret>` → admin HTML

use std::time::Duration;

use reqwest::{Client, Response};

use crate::config::BackendConfig;
use crate::http::request::TraceContext;

/// Thin wrapper over a pooled `reqwest` client bound to one backend.
#[derive(Debug, Clone)]
pub struct BackendClient {
    http: Client,
    base_url: String,
    max_resolve_body_bytes: usize,
}

impl BackendClient {
    /// Create a client for `base_url` (already normalized, no trailing slash).
    pub fn new(base_url: impl Into<String>, config: &BackendConfig) -> Result<Self, reqwest::Error> {
        // Redirects are followed: script backends answer through a redirect
        // to their content host.
        let http = Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.into(),
            max_resolve_body_bytes: config.max_resolve_body_bytes,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn max_resolve_body_bytes(&self) -> usize {
        self.max_resolve_body_bytes
    }

    /// Fast text lookup. Also registers the click on the backend side.
    pub async fn resolve(&self, slug: &str, trace: &TraceContext) -> Result<Response, reqwest::Error> {
        let mut params = vec![("resolve", slug)];
        params.extend(trace.query_params());
        self.get(&params, trace).await
    }

    /// HTML fallback page for a slug.
    pub async fn page(&self, slug: &str, trace: &TraceContext) -> Result<Response, reqwest::Error> {
        let mut params = vec![("s", slug)];
        params.extend(trace.query_params());
        self.get(&params, trace).await
    }

    /// QR image for a slug.
    pub async fn qr(&self, slug: &str, trace: &TraceContext) -> Result<Response, reqwest::Error> {
        self.get(&[("qr", slug)], trace).await
    }

    /// Admin panel HTML, fetched with the panel secret.
    pub async fn admin_panel(&self, pass: &str, trace: &TraceContext) -> Result<Response, reqwest::Error> {
        self.get(&[("admin", "1"), ("pass", pass)], trace).await
    }

    async fn get(&self, params: &[(&str, &str)], trace: &TraceContext) -> Result<Response, reqwest::Error> {
        self.http
            .get(self.endpoint(params))
            .headers(trace.forward_headers())
            .send()
            .await
    }

    /// Append percent-encoded query pairs to the base URL.
    pub fn endpoint(&self, params: &[(&str, &str)]) -> String {
        let query = params
            .iter()
            .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&");
        let separator = if self.base_url.contains('?') { '&' } else { '?' };
        format!("{}{}{}", self.base_url, separator, query)
    }
}

/// Read a response body fully, giving up with `None` once it exceeds `limit`
/// bytes or turns out not to be UTF-8.
pub async fn read_bounded_text(mut response: Response, limit: usize) -> Result<Option<String>, reqwest::Error> {
    let mut buf = Vec::new();
    while let Some(chunk) = response.chunk().await? {
        if buf.len() + chunk.len() > limit {
            return Ok(None);
        }
        buf.extend_from_slice(&chunk);
    }
    Ok(String::from_utf8(buf).ok())
}
