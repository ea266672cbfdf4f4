//! Administrative route.
//!
//! ```text
//! GET /admin
//!     → auth.rs (Basic-Auth, open when unconfigured)  ── fail → 401 + challenge
//!     → ADMIN_PASS configured?                         ── no   → 403
//!     → handlers.rs (fetch ?admin=1&pass=… server-side, relay)
//! ```

pub mod auth;
pub mod handlers;

pub use auth::{check_admin_auth, AdminAuth};
pub use handlers::admin_panel;
