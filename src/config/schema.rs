//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the mock
//! proxy. All types derive Serde traits for deserialization from config
//! files. The match-policy fields accept the historical config forms
//! (`false`, `true`, or a list of names) but are carried in code as
//! explicit enums so every branch is spelled out.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration for the mock proxy.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ProxyConfig {
    /// Listener configuration (bind address, limits).
    pub listener: ListenerConfig,

    /// Base directory the mock tree lives under.
    pub data_root: PathBuf,

    /// Log every resolved mock path at info level.
    pub verbose_paths: bool,

    /// Base URL requests are forwarded to when no mock is on disk.
    /// Absent means misses answer 404.
    pub upstream: Option<String>,

    /// Route definitions mapping request paths to mock directories.
    pub routes: Vec<RouteConfig>,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    #[serde(default)]
    pub admin: AdminConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,

    /// Request timeout in seconds.
    pub request_timeout_secs: u64,

    /// Maximum buffered request body size in bytes.
    pub max_body_size: usize,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            request_timeout_secs: 30,
            max_body_size: 2 * 1024 * 1024,
        }
    }
}

/// Per-route configuration: which requests it covers and how their mock
/// lookup key is built.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct RouteConfig {
    /// Route identifier for logging.
    pub name: String,

    /// Path prefix to match; the longest matching prefix wins.
    pub path_prefix: String,

    /// Base subdirectory of the mock tree for this route.
    pub dir: String,

    /// Which request headers participate in the lookup key.
    pub match_headers: HeaderMatch,

    /// Which request properties participate in the lookup key.
    pub match_props: PropsMatch,

    /// Properties excluded from the key regardless of `match_props`.
    pub ignore_props: Vec<String>,
}

/// Header participation policy.
///
/// Config forms: absent or `false` → `None`, `true` → `All`, a list of
/// names → `Named`. A name prefixed with `@` asks for presence-only
/// matching (the key records that the header was sent, not its value).
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(from = "MatchPolicyRepr", into = "MatchPolicyRepr")]
pub enum HeaderMatch {
    #[default]
    None,
    All,
    Named(Vec<String>),
}

/// Properties participation policy.
///
/// Config forms: absent or `true` → `All`, `false` → `None`, a list of
/// names → `Only` (kept in the given order).
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(from = "MatchPolicyRepr", into = "MatchPolicyRepr")]
pub enum PropsMatch {
    #[default]
    All,
    None,
    Only(Vec<String>),
}

/// Wire form shared by both match policies.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(untagged)]
pub enum MatchPolicyRepr {
    Toggle(bool),
    Named(Vec<String>),
}

impl From<MatchPolicyRepr> for HeaderMatch {
    fn from(repr: MatchPolicyRepr) -> Self {
        match repr {
            MatchPolicyRepr::Toggle(false) => HeaderMatch::None,
            MatchPolicyRepr::Toggle(true) => HeaderMatch::All,
            MatchPolicyRepr::Named(names) => HeaderMatch::Named(names),
        }
    }
}

impl From<HeaderMatch> for MatchPolicyRepr {
    fn from(policy: HeaderMatch) -> Self {
        match policy {
            HeaderMatch::None => MatchPolicyRepr::Toggle(false),
            HeaderMatch::All => MatchPolicyRepr::Toggle(true),
            HeaderMatch::Named(names) => MatchPolicyRepr::Named(names),
        }
    }
}

impl From<MatchPolicyRepr> for PropsMatch {
    fn from(repr: MatchPolicyRepr) -> Self {
        match repr {
            MatchPolicyRepr::Toggle(false) => PropsMatch::None,
            MatchPolicyRepr::Toggle(true) => PropsMatch::All,
            MatchPolicyRepr::Named(names) => PropsMatch::Only(names),
        }
    }
}

impl From<PropsMatch> for MatchPolicyRepr {
    fn from(policy: PropsMatch) -> Self {
        match policy {
            PropsMatch::All => MatchPolicyRepr::Toggle(true),
            PropsMatch::None => MatchPolicyRepr::Toggle(false),
            PropsMatch::Only(names) => MatchPolicyRepr::Named(names),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

/// Admin endpoint configuration (the reserved `/__` surface).
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AdminConfig {
    /// Enable the admin endpoints.
    pub enabled: bool,

    /// API key for authentication (Bearer token). Empty disables auth.
    pub api_key: String,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            api_key: String::new(),
        }
    }
}
