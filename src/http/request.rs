//! Request handling.
//!
//! # Responsibilities
//! - Generate and propagate a per-request ID (UUID v4)
//! - Assemble the resolver's `MockRequest` view from an incoming
//!   request: raw path, method, full target URL, props from the query
//!   string and body, headers in received order
//!
//! # Design Decisions
//! - Props and headers land in insertion-ordered maps so "match all"
//!   policies derive stable lookup keys
//! - Body props are best-effort: an unparseable body contributes none

use axum::http::header::HOST;
use axum::http::request::Parts;
use axum::http::{HeaderValue, Request};
use indexmap::IndexMap;
use tower_http::request_id::{MakeRequestId, RequestId};
use url::form_urlencoded;

use crate::config::RouteConfig;
use crate::mockpath::{MockRequest, PropValue};

/// Header carrying the request ID.
pub const X_REQUEST_ID: &str = "x-request-id";

/// UUID v4 request IDs for `SetRequestIdLayer`.
#[derive(Clone, Copy, Default)]
pub struct UuidRequestId;

impl MakeRequestId for UuidRequestId {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        let id = uuid::Uuid::new_v4().to_string();
        HeaderValue::from_str(&id).ok().map(RequestId::new)
    }
}

/// Assemble the resolver input for a request matched to `conf`.
///
/// `upstream` is the configured live base URL; without one the target
/// URL is reconstructed from the Host header so the resolver still has
/// a parseable absolute URL to work from.
pub fn build_mock_request(
    parts: &Parts,
    body: &[u8],
    conf: RouteConfig,
    upstream: Option<&str>,
) -> MockRequest {
    let raw_url = parts
        .uri
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or("")
        .to_string();

    let url_to_proxy = match upstream {
        Some(base) => format!("{}{}", base.trim_end_matches('/'), raw_url),
        None => {
            let host = parts
                .headers
                .get(HOST)
                .and_then(|v| v.to_str().ok())
                .unwrap_or("localhost");
            format!("http://{}{}", host, raw_url)
        }
    };

    let mut props = IndexMap::new();
    if let Some(query) = parts.uri.query() {
        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            insert_prop(&mut props, key.into_owned(), value.into_owned());
        }
    }
    collect_body_props(&mut props, parts, body);

    let mut headers = IndexMap::new();
    for (name, value) in &parts.headers {
        headers.insert(
            name.as_str().to_string(),
            String::from_utf8_lossy(value.as_bytes()).into_owned(),
        );
    }

    MockRequest {
        url: raw_url,
        method: parts.method.as_str().to_string(),
        url_to_proxy,
        props,
        headers,
        conf,
    }
}

fn insert_prop(props: &mut IndexMap<String, PropValue>, key: String, value: String) {
    match props.get_mut(&key) {
        Some(existing) => existing.push(value),
        None => {
            props.insert(key, PropValue::Single(value));
        }
    }
}

/// Fold body parameters into `props`, after the query string.
fn collect_body_props(props: &mut IndexMap<String, PropValue>, parts: &Parts, body: &[u8]) {
    if body.is_empty() {
        return;
    }
    let content_type = parts
        .headers
        .get(axum::http::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");

    if content_type.starts_with("application/x-www-form-urlencoded") {
        for (key, value) in form_urlencoded::parse(body) {
            insert_prop(props, key.into_owned(), value.into_owned());
        }
    } else if content_type.starts_with("application/json") {
        let Ok(serde_json::Value::Object(object)) = serde_json::from_slice(body) else {
            return;
        };
        for (key, value) in object {
            match value {
                serde_json::Value::Null => {}
                serde_json::Value::Array(items) => {
                    let values = items.iter().map(scalar_to_string).collect();
                    props.insert(key, PropValue::List(values));
                }
                other => insert_prop(props, key, scalar_to_string(&other)),
            }
        }
    }
}

fn scalar_to_string(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
