//! Link-resolution backend subsystem.
//!
//! # Data Flow
//! ```text
//! SlugLookup(slug) + TraceContext
//!     → resolver.rs (Phase 1 text lookup, Phase 2 fallback)
//!     → trust.rs (validate the Phase 1 answer)
//!     → client.rs (outbound HTTP, forwarded headers)
//!     → LookupResult
//! ```
//!
//! # Design Decisions
//! - The backend is an opaque collaborator reached only over HTTP
//! - Its answers are never placed in a response header unchecked
//! - No caching: every lookup reaches the backend (it counts clicks)

pub mod client;
pub mod resolver;
pub mod trust;

pub use client::BackendClient;
pub use resolver::{resolve, LookupResult};
pub use trust::{is_trusted_url, RedirectTarget};
