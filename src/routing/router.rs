//! Route lookup.

use crate::config::RouteConfig;

/// Immutable table of routes, longest prefix first.
#[derive(Debug, Default)]
pub struct MockRouter {
    routes: Vec<RouteConfig>,
}

impl MockRouter {
    /// Compile a router from route configuration.
    ///
    /// Routes are ordered by descending prefix length so the scan can
    /// stop at the first hit. Path matching is case-sensitive.
    pub fn from_config(mut routes: Vec<RouteConfig>) -> Self {
        routes.sort_by(|a, b| b.path_prefix.len().cmp(&a.path_prefix.len()));
        Self { routes }
    }

    /// Look up the route covering a request path.
    pub fn match_path(&self, path: &str) -> Option<&RouteConfig> {
        self.routes
            .iter()
            .find(|route| path.starts_with(&route.path_prefix))
    }

    /// All configured routes, in match order.
    pub fn routes(&self) -> &[RouteConfig] {
        &self.routes
    }
}
