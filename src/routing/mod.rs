//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming Request (path)
//!     → normalize_path (strip leading slashes)
//!     → route (ordered prefix/equality rules)
//!     → Return: RouteDecision
//! ```
//!
//! # Design Decisions
//! - No regex in hot path (prefix matching only)
//! - Deterministic: same input always yields the same decision
//! - First match wins

pub mod router;

pub use router::{normalize_path, route, RouteDecision};
