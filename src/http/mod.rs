//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware, dispatch)
//!     → request.rs (request ID, MockRequest assembly)
//!     → [mockpath derives the lookup key]
//!     → response.rs (passthru writer / fixed 500)
//!     → Send to client
//! ```

pub mod request;
pub mod response;
pub mod server;

pub use request::{UuidRequestId, X_REQUEST_ID};
pub use response::{error_response, passthru};
pub use server::{AppState, HttpServer};
