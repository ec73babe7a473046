//! Mock lookup-key derivation subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request (method, target url, props, headers)
//!     + matched RouteConfig (dir, match/ignore policies)
//!     → resolver.rs (orchestrates segment assembly)
//!         → sanitize.rs (filesystem-safe substitutions)
//!         → selectors.rs (props + header segment selection)
//!     → Return: Some(<data_root>/<dir>/<method>/.../<segment>.mock) or None
//! ```
//!
//! # Design Decisions
//! - Pure functions of the request and data root: no I/O, no caching,
//!   no ambient state. Safe to call from any number of in-flight requests.
//! - Props and headers travel in insertion-ordered maps so that the
//!   "include everything" policies produce the same path on every run.
//! - Match policies are explicit enums (see config::schema), never
//!   truthiness checks.
//! - The verbosity toggle is injected by the caller, not read from the
//!   process environment.

pub mod resolver;
pub mod sanitize;
pub mod selectors;

pub use resolver::{resolve_mock_path, should_ignore, MOCK_FILE_EXT, PROPS_SEGMENT_CAP};
pub use sanitize::strip_special_chars;

use indexmap::IndexMap;

use crate::config::RouteConfig;

/// A request property value, as gathered from the query string or body.
///
/// Repeated parameters collapse into `List`, which the props segment
/// encodes as repeated `key=value` pairs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropValue {
    Single(String),
    List(Vec<String>),
}

impl PropValue {
    /// Fold another occurrence of the same parameter into this value.
    pub fn push(&mut self, value: String) {
        match self {
            PropValue::Single(first) => {
                *self = PropValue::List(vec![std::mem::take(first), value]);
            }
            PropValue::List(values) => values.push(value),
        }
    }
}

impl From<&str> for PropValue {
    fn from(value: &str) -> Self {
        PropValue::Single(value.to_string())
    }
}

impl From<String> for PropValue {
    fn from(value: String) -> Self {
        PropValue::Single(value)
    }
}

/// The request-shaped input of the resolver.
///
/// Assembled by the HTTP layer (see `http::request`); the resolver only
/// reads it. `url` is the raw path the client asked the proxy for and is
/// consulted by [`should_ignore`] alone; `url_to_proxy` is the full target
/// URL the request would be forwarded to, query string included.
#[derive(Debug, Clone)]
pub struct MockRequest {
    pub url: String,
    pub method: String,
    pub url_to_proxy: String,
    pub props: IndexMap<String, PropValue>,
    pub headers: IndexMap<String, String>,
    pub conf: RouteConfig,
}
