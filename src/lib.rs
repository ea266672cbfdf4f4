//! Short-link edge handler.
//!
//! Fronts an external link-resolution backend: classifies each request path,
//! resolves slugs through a two-phase lookup with trust validation, relays QR
//! images and the admin panel, and renders the landing and not-found pages.

pub mod admin;
pub mod backend;
pub mod config;
pub mod error;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;

pub use config::schema::EdgeConfig;
pub use error::EdgeError;
pub use http::EdgeServer;
pub use lifecycle::Shutdown;
