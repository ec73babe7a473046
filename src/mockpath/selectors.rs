//! Props and header segment selection.
//!
//! # Responsibilities
//! - Apply the route's match/ignore policy to request properties
//! - Serialize selected properties as a query string
//! - Apply the route's header policy, honoring `@` presence-only markers
//!
//! # Design Decisions
//! - Selection preserves the order given by the policy list, or the
//!   insertion order of the underlying map for the "all" policies
//! - Header pieces are joined as path segments, never concatenated

use url::form_urlencoded;

use crate::config::{HeaderMatch, PropsMatch};
use crate::mockpath::sanitize::strip_special_chars;
use crate::mockpath::{MockRequest, PropValue};

/// Marker on a configured header name requesting presence-only matching.
const PRESENCE_ONLY_PREFIX: char = '@';

/// Build the properties segment for a request.
///
/// Applies `match_props` (only the named properties, none, or all of
/// them), removes anything named in `ignore_props`, serializes the rest
/// with standard query-string conventions (list values become repeated
/// keys), and sanitizes the result. Empty selection yields an empty
/// string.
pub fn select_props(req: &MockRequest) -> String {
    let mut selected: Vec<(&str, &PropValue)> = Vec::new();
    match &req.conf.match_props {
        PropsMatch::Only(names) => {
            for name in names {
                if let Some(value) = req.props.get(name.as_str()) {
                    selected.push((name.as_str(), value));
                }
            }
        }
        PropsMatch::None => {}
        PropsMatch::All => {
            selected.extend(req.props.iter().map(|(k, v)| (k.as_str(), v)));
        }
    }
    selected.retain(|(name, _)| !req.conf.ignore_props.iter().any(|p| p == name));

    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for (name, value) in selected {
        match value {
            PropValue::Single(v) => {
                serializer.append_pair(name, v);
            }
            PropValue::List(vs) => {
                for v in vs {
                    serializer.append_pair(name, v);
                }
            }
        }
    }
    strip_special_chars(&serializer.finish())
}

/// Build the header segment for a request.
///
/// With a `Named` policy, configured names are visited in order; present
/// headers contribute a sanitized `name/value` piece, or just the
/// sanitized name when the configured entry carried the `@` prefix.
/// With the `All` policy every stored header contributes `name/value`.
/// Pieces are joined as additional path segments; nothing matched yields
/// an empty string.
pub fn select_headers(req: &MockRequest) -> String {
    let mut pieces: Vec<String> = Vec::new();
    match &req.conf.match_headers {
        HeaderMatch::Named(names) => {
            for name in names {
                let (presence_only, name) = match name.strip_prefix(PRESENCE_ONLY_PREFIX) {
                    Some(stripped) => (true, stripped),
                    None => (false, name.as_str()),
                };
                if let Some(value) = req.headers.get(name) {
                    if presence_only {
                        pieces.push(strip_special_chars(name));
                    } else {
                        pieces.push(strip_special_chars(&format!("{}/{}", name, value)));
                    }
                }
            }
        }
        HeaderMatch::All => {
            for (name, value) in &req.headers {
                pieces.push(strip_special_chars(&format!("{}/{}", name, value)));
            }
        }
        HeaderMatch::None => {}
    }
    pieces.join("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RouteConfig;
    use indexmap::IndexMap;

    fn request_with(conf: RouteConfig) -> MockRequest {
        MockRequest {
            url: "/orders/7".to_string(),
            method: "GET".to_string(),
            url_to_proxy: "http://upstream/orders/7".to_string(),
            props: IndexMap::new(),
            headers: IndexMap::new(),
            conf,
        }
    }

    #[test]
    fn test_props_only_named_in_given_order() {
        let mut req = request_with(RouteConfig {
            match_props: PropsMatch::Only(vec!["b".to_string(), "a".to_string()]),
            ..RouteConfig::default()
        });
        req.props.insert("a".to_string(), "1".into());
        req.props.insert("b".to_string(), "2".into());
        req.props.insert("c".to_string(), "3".into());

        assert_eq!(select_props(&req), "b=2&a=1");
    }

    #[test]
    fn test_props_none_policy_selects_nothing() {
        let mut req = request_with(RouteConfig {
            match_props: PropsMatch::None,
            ..RouteConfig::default()
        });
        req.props.insert("a".to_string(), "1".into());

        assert_eq!(select_props(&req), "");
    }

    #[test]
    fn test_props_all_policy_keeps_insertion_order() {
        let mut req = request_with(RouteConfig::default());
        req.props.insert("z".to_string(), "26".into());
        req.props.insert("a".to_string(), "1".into());

        assert_eq!(select_props(&req), "z=26&a=1");
    }

    #[test]
    fn test_ignore_list_beats_match_list() {
        let mut req = request_with(RouteConfig {
            match_props: PropsMatch::Only(vec!["token".to_string(), "id".to_string()]),
            ignore_props: vec!["token".to_string()],
            ..RouteConfig::default()
        });
        req.props.insert("token".to_string(), "secret".into());
        req.props.insert("id".to_string(), "7".into());

        assert_eq!(select_props(&req), "id=7");
    }

    #[test]
    fn test_list_values_encode_as_repeated_keys() {
        let mut req = request_with(RouteConfig::default());
        req.props.insert(
            "tag".to_string(),
            PropValue::List(vec!["x".to_string(), "y".to_string()]),
        );

        assert_eq!(select_props(&req), "tag=x&tag=y");
    }

    #[test]
    fn test_props_output_is_sanitized() {
        let mut req = request_with(RouteConfig::default());
        req.props.insert("q".to_string(), "a*b".into());

        // form_urlencoded leaves `*` bare; the sanitizer catches it.
        assert_eq!(select_props(&req), "q=a%2Ab");
    }

    #[test]
    fn test_headers_named_value_pair_is_one_segment() {
        let mut req = request_with(RouteConfig {
            match_headers: HeaderMatch::Named(vec!["x-api-key".to_string()]),
            ..RouteConfig::default()
        });
        req.headers
            .insert("x-api-key".to_string(), "abc".to_string());

        // The name/value separator is itself sanitized into `__`.
        assert_eq!(select_headers(&req), "x-api-key__abc");
    }

    #[test]
    fn test_headers_presence_only_marker() {
        let mut req = request_with(RouteConfig {
            match_headers: HeaderMatch::Named(vec![
                "@authorization".to_string(),
                "accept".to_string(),
            ]),
            ..RouteConfig::default()
        });
        req.headers
            .insert("authorization".to_string(), "Bearer xyz".to_string());
        req.headers
            .insert("accept".to_string(), "application/json".to_string());

        assert_eq!(
            select_headers(&req),
            "authorization/accept__application__json"
        );
    }

    #[test]
    fn test_headers_absent_names_contribute_nothing() {
        let req = request_with(RouteConfig {
            match_headers: HeaderMatch::Named(vec![
                "@x-missing".to_string(),
                "x-also-missing".to_string(),
            ]),
            ..RouteConfig::default()
        });

        assert_eq!(select_headers(&req), "");
    }

    #[test]
    fn test_headers_all_policy_uses_stored_order() {
        let mut req = request_with(RouteConfig {
            match_headers: HeaderMatch::All,
            ..RouteConfig::default()
        });
        req.headers.insert("b".to_string(), "2".to_string());
        req.headers.insert("a".to_string(), "1".to_string());

        assert_eq!(select_headers(&req), "b__2/a__1");
    }

    #[test]
    fn test_headers_none_policy_is_empty() {
        let mut req = request_with(RouteConfig::default());
        req.headers.insert("a".to_string(), "1".to_string());

        assert_eq!(select_headers(&req), "");
    }
}
