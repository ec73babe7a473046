//! Configuration validation.
//!
//! Semantic checks on top of what serde already guarantees: routes must
//! name a mock directory, prefixes must not collide, and the upstream
//! must be a parseable base URL. All errors are collected, not just the
//! first.

use std::collections::HashSet;

use url::Url;

use crate::config::schema::ProxyConfig;

/// A single semantic problem found in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("data_root must not be empty")]
    EmptyDataRoot,

    #[error("route '{route}' has no mock directory (dir)")]
    RouteMissingDir { route: String },

    #[error("duplicate route name '{name}'")]
    DuplicateRouteName { name: String },

    #[error("duplicate path_prefix '{prefix}'")]
    DuplicatePathPrefix { prefix: String },

    #[error("upstream '{url}' is not a valid URL: {reason}")]
    InvalidUpstream { url: String, reason: String },
}

/// Validate a configuration, returning every problem found.
pub fn validate_config(config: &ProxyConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.data_root.as_os_str().is_empty() {
        errors.push(ValidationError::EmptyDataRoot);
    }

    let mut seen_names = HashSet::new();
    let mut seen_prefixes = HashSet::new();
    for route in &config.routes {
        if route.dir.is_empty() {
            errors.push(ValidationError::RouteMissingDir {
                route: route.name.clone(),
            });
        }
        if !route.name.is_empty() && !seen_names.insert(route.name.clone()) {
            errors.push(ValidationError::DuplicateRouteName {
                name: route.name.clone(),
            });
        }
        if !seen_prefixes.insert(route.path_prefix.clone()) {
            errors.push(ValidationError::DuplicatePathPrefix {
                prefix: route.path_prefix.clone(),
            });
        }
    }

    if let Some(upstream) = &config.upstream {
        if let Err(e) = Url::parse(upstream) {
            errors.push(ValidationError::InvalidUpstream {
                url: upstream.clone(),
                reason: e.to_string(),
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::RouteConfig;
    use std::path::PathBuf;

    fn base_config() -> ProxyConfig {
        ProxyConfig {
            data_root: PathBuf::from("./mocks"),
            routes: vec![RouteConfig {
                name: "orders".to_string(),
                path_prefix: "/orders".to_string(),
                dir: "orders".to_string(),
                ..RouteConfig::default()
            }],
            ..ProxyConfig::default()
        }
    }

    #[test]
    fn test_valid_config_passes() {
        assert!(validate_config(&base_config()).is_ok());
    }

    #[test]
    fn test_all_errors_are_collected() {
        let mut config = base_config();
        config.data_root = PathBuf::new();
        config.routes.push(RouteConfig {
            name: "orders".to_string(),
            path_prefix: "/orders".to_string(),
            dir: String::new(),
            ..RouteConfig::default()
        });
        config.upstream = Some("not a url".to_string());

        let errors = validate_config(&config).unwrap_err();
        assert!(errors.contains(&ValidationError::EmptyDataRoot));
        assert!(errors.contains(&ValidationError::RouteMissingDir {
            route: "orders".to_string()
        }));
        assert!(errors.contains(&ValidationError::DuplicateRouteName {
            name: "orders".to_string()
        }));
        assert!(errors.contains(&ValidationError::DuplicatePathPrefix {
            prefix: "/orders".to_string()
        }));
        assert_eq!(errors.len(), 5);
    }
}
