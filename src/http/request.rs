//! Request handling and transformation.
//!
//! # Responsibilities
//! - Generate a unique request ID (UUID v4)
//! - Extract the trace context forwarded to the backend
//!
//! # Design Decisions
//! - Request ID added as early as possible for tracing
//! - Trace context is extracted once per request and reused for both
//!   outbound headers and query parameters

use std::net::IpAddr;

use axum::http::{header, HeaderMap, HeaderName, HeaderValue, Request};
use tower_http::request_id::{MakeRequestId, RequestId};
use uuid::Uuid;

/// Header carrying the request ID.
pub const X_REQUEST_ID: &str = "x-request-id";

const X_FORWARDED_FOR: &str = "x-forwarded-for";
const X_REAL_IP: &str = "x-real-ip";

/// Generates UUID v4 request IDs for `SetRequestIdLayer`.
#[derive(Debug, Clone, Copy, Default)]
pub struct MakeRequestUuidV4;

impl MakeRequestId for MakeRequestUuidV4 {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        HeaderValue::from_str(&Uuid::new_v4().to_string())
            .ok()
            .map(RequestId::new)
    }
}

/// Read the request ID set by the request-id layer.
pub fn request_id(headers: &HeaderMap) -> &str {
    headers
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
}

/// Visitor metadata forwarded to the backend on every call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TraceContext {
    pub user_agent: String,
    pub referer: String,
    /// Raw forwarded-for chain (or real IP / peer address when absent).
    pub forwarded_for: String,
    /// First hop of the forwarded-for chain.
    pub client_ip: String,
    pub accept_language: String,
    pub country: String,
}

impl TraceContext {
    /// Extract from inbound headers. `peer` is the socket address of the
    /// connection, used when no proxy header names the client.
    pub fn from_headers(headers: &HeaderMap, peer: Option<IpAddr>, country_headers: &[String]) -> Self {
        let forwarded_for = header_str(headers, X_FORWARDED_FOR)
            .or_else(|| header_str(headers, X_REAL_IP))
            .map(str::to_string)
            .or_else(|| peer.map(|ip| ip.to_string()))
            .unwrap_or_default();

        let client_ip = forwarded_for
            .split(',')
            .next()
            .unwrap_or_default()
            .trim()
            .to_string();

        let country = country_headers
            .iter()
            .find_map(|name| header_str(headers, name))
            .unwrap_or_default()
            .to_string();

        Self {
            user_agent: header_str(headers, header::USER_AGENT.as_str())
                .unwrap_or_default()
                .to_string(),
            referer: header_str(headers, header::REFERER.as_str())
                .unwrap_or_default()
                .to_string(),
            forwarded_for,
            client_ip,
            accept_language: header_str(headers, header::ACCEPT_LANGUAGE.as_str())
                .unwrap_or_default()
                .to_string(),
            country,
        }
    }

    /// Trace query parameters for the resolve and page endpoints.
    pub fn query_params(&self) -> [(&'static str, &str); 4] {
        [
            ("ua", self.user_agent.as_str()),
            ("ref", self.referer.as_str()),
            ("ip", self.client_ip.as_str()),
            ("cc", self.country.as_str()),
        ]
    }

    /// Headers attached to every backend call. Empty values are omitted.
    pub fn forward_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        let pairs = [
            (header::USER_AGENT, &self.user_agent),
            (header::REFERER, &self.referer),
            (HeaderName::from_static(X_FORWARDED_FOR), &self.forwarded_for),
            (header::ACCEPT_LANGUAGE, &self.accept_language),
        ];
        for (name, value) in pairs {
            if value.is_empty() {
                continue;
            }
            if let Ok(value) = HeaderValue::from_str(value) {
                headers.insert(name, value);
            }
        }
        headers
    }
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
}
