//! HTML pages rendered locally.

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use html_escape::{encode_double_quoted_attribute, encode_text};

/// Landing / health page.
pub fn landing(backend_base: &str) -> Response {
    let body = format!(
        concat!(
            "<!doctype html><meta charset=\"utf-8\"><title>Short links</title>",
            "<div style=\"font-family:system-ui,Segoe UI,Roboto;padding:24px\">",
            "<h1 style=\"margin:0 0 8px\">Short links</h1>",
            "<p>Health OK. <a href=\"{}\" target=\"_blank\" rel=\"noreferrer noopener\">Open backend</a></p>",
            "<ul>",
            "<li>Short: <code>/&lt;slug&gt;</code> or <code>/s/&lt;slug&gt;</code></li>",
            "<li>QR: <code>/qr/&lt;slug&gt;</code></li>",
            "<li>Panel: <code>/admin</code></li>",
            "</ul>",
            "</div>"
        ),
        encode_double_quoted_attribute(backend_base)
    );
    (StatusCode::OK, Html(body)).into_response()
}

/// Friendly 404 page. The slug is echoed back escaped.
pub fn not_found(slug: Option<&str>) -> Response {
    let detail = match slug {
        Some(slug) => format!("<p>No link named <code>{}</code>.</p>", encode_text(slug)),
        None => String::new(),
    };
    let body = format!(
        concat!(
            "<!doctype html><meta charset=\"utf-8\"><title>Not found</title>",
            "<div style=\"font-family:system-ui,Segoe UI,Roboto;padding:24px\">",
            "<h1 style=\"margin:0 0 8px\">Not found</h1>",
            "{}",
            "<p><a href=\"/\">Home</a></p>",
            "</div>"
        ),
        detail
    );
    (StatusCode::NOT_FOUND, Html(body)).into_response()
}
