//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request path
//!     → router.rs (prefix scan over configured routes)
//!     → Return: matched RouteConfig or None
//!
//! Route Compilation (at startup and on reload):
//!     RouteConfig[]
//!     → Sort by prefix length, longest first
//!     → Freeze as immutable MockRouter
//! ```
//!
//! # Design Decisions
//! - Routes compiled at startup, immutable at runtime
//! - No regex in hot path (prefix matching only)
//! - Deterministic: same path always matches same route
//! - Longest matching prefix wins

pub mod router;

pub use router::MockRouter;
