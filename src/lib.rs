//! API-Mocking Proxy Library
//!
//! Serves recorded responses from a mock tree on disk, keyed by a
//! deterministic path derived from each request, and forwards misses to
//! a live upstream.

pub mod admin;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod mockpath;
pub mod observability;
pub mod routing;

pub use config::ProxyConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use mockpath::{resolve_mock_path, should_ignore, MockRequest};
