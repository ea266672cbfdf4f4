//! Response handling and transformation.
//!
//! # Responsibilities
//! - Relay backend responses to the client (status, headers, body)
//! - Strip hop-by-hop headers
//! - Build no-store redirects
//!
//! # Design Decisions
//! - Streaming responses avoid buffering entire body
//! - Responses whose content depends on the visitor are never cacheable

use axum::{
    body::Body,
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};

use crate::backend::RedirectTarget;

const NO_STORE: &str = "no-store, max-age=0";

/// Headers that describe a single connection and must not be relayed.
const HOP_BY_HOP: [&str; 8] = [
    "connection",
    "keep-alive",
    "proxy-authenticate",
    "proxy-authorization",
    "te",
    "trailer",
    "transfer-encoding",
    "upgrade",
];

/// Relay a backend response unmodified, streaming the body.
pub fn relay(upstream: reqwest::Response) -> Response {
    let status = upstream.status();
    let mut headers = upstream.headers().clone();
    strip_hop_by_hop(&mut headers);

    let mut response = Response::new(Body::from_stream(upstream.bytes_stream()));
    *response.status_mut() = status;
    *response.headers_mut() = headers;
    response
}

/// Force `Cache-Control: no-store` on a response.
pub fn no_store(mut response: Response) -> Response {
    let headers = response.headers_mut();
    headers.insert(header::CACHE_CONTROL, HeaderValue::from_static(NO_STORE));
    headers.remove(header::EXPIRES);
    headers.remove(header::ETAG);
    headers.remove(header::LAST_MODIFIED);
    response
}

/// 302 to a trusted target, never cacheable.
pub fn redirect_no_store(target: &RedirectTarget) -> Response {
    (
        StatusCode::FOUND,
        [
            (header::LOCATION, target.header_value().clone()),
            (header::CACHE_CONTROL, HeaderValue::from_static(NO_STORE)),
            (header::PRAGMA, HeaderValue::from_static("no-cache")),
        ],
    )
        .into_response()
}

/// Remove hop-by-hop headers, including any named by `Connection`.
pub fn strip_hop_by_hop(headers: &mut HeaderMap) {
    let named: Vec<String> = headers
        .get_all(header::CONNECTION)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(','))
        .map(|name| name.trim().to_ascii_lowercase())
        .filter(|name| !name.is_empty())
        .collect();

    for name in named.iter().map(String::as_str).chain(HOP_BY_HOP) {
        headers.remove(name);
    }
}
