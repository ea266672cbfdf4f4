//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware, dispatch)
//!     → request.rs (request ID, trace context)
//!     → [routing decides the stage]
//!     → [admin gate / backend resolver]
//!     → response.rs (relay, no-store, redirect) or pages.rs (local HTML)
//!     → Send to client
//! ```

pub mod pages;
pub mod request;
pub mod response;
pub mod server;

pub use request::{MakeRequestUuidV4, TraceContext, X_REQUEST_ID};
pub use server::{build_router, AppState, EdgeServer};
