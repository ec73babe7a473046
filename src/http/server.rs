//! HTTP server setup and mock dispatch.
//!
//! # Responsibilities
//! - Create Axum Router with the admin surface and the mock handler
//! - Wire up middleware (tracing, timeout, request ID)
//! - Gate requests through `should_ignore`
//! - Match a route, derive the mock path, serve the file on a hit
//! - Forward misses to the configured upstream, or answer 404
//! - Observability (metrics, structured logs)

use std::sync::atomic::AtomicUsize;
use std::sync::Arc;
use std::time::{Duration, Instant};

use arc_swap::ArcSwap;
use axum::{
    body::Body,
    extract::State,
    http::{header, Request, Response, StatusCode, Uri},
    response::IntoResponse,
    Router,
};
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::admin;
use crate::config::ProxyConfig;
use crate::http::request::{build_mock_request, UuidRequestId, X_REQUEST_ID};
use crate::http::response::{error_response, passthru};
use crate::mockpath::{resolve_mock_path, should_ignore};
use crate::observability::metrics;
use crate::routing::MockRouter;

/// State shared by every handler; swapped wholesale on config reload.
pub struct SharedState {
    pub config: ProxyConfig,
    pub router: MockRouter,
    pub client: Client<HttpConnector, Body>,
    pub request_count: AtomicUsize,
}

impl SharedState {
    pub fn new(config: ProxyConfig) -> Self {
        let router = MockRouter::from_config(config.routes.clone());
        let client = Client::builder(TokioExecutor::new()).build(HttpConnector::new());
        Self {
            config,
            router,
            client,
            request_count: AtomicUsize::new(0),
        }
    }
}

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub inner: Arc<ArcSwap<SharedState>>,
}

impl AppState {
    pub fn new(config: ProxyConfig) -> Self {
        Self {
            inner: Arc::new(ArcSwap::from_pointee(SharedState::new(config))),
        }
    }

    /// Swap in a reloaded configuration. In-flight requests keep the
    /// state they already loaded.
    pub fn replace_config(&self, config: ProxyConfig) {
        self.inner.store(Arc::new(SharedState::new(config)));
    }
}

/// HTTP server for the mock proxy.
pub struct HttpServer {
    router: Router,
    state: AppState,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: ProxyConfig) -> Self {
        let state = AppState::new(config.clone());
        let router = Self::build_router(&config, state.clone());
        Self { router, state }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &ProxyConfig, state: AppState) -> Router {
        let mut router = Router::new();
        if config.admin.enabled {
            router = router.merge(admin::setup_admin_router(state.clone()));
        }
        router
            .fallback(mock_handler)
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(
                config.listener.request_timeout_secs,
            )))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(SetRequestIdLayer::x_request_id(UuidRequestId))
            .layer(TraceLayer::new_for_http())
    }

    /// Handle on the shared state, for reload plumbing.
    pub fn state(&self) -> AppState {
        self.state.clone()
    }

    /// Run the server until the shutdown signal fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Main mock handler.
/// Gates the request, derives the lookup key, and serves or forwards.
async fn mock_handler(State(state): State<AppState>, request: Request<Body>) -> Response<Body> {
    let start_time = Instant::now();
    let inner = state.inner.load_full();
    inner
        .request_count
        .fetch_add(1, std::sync::atomic::Ordering::Relaxed);

    let request_id = request
        .headers()
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
        .to_string();
    let raw_url = request
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or("")
        .to_string();
    let method = request.method().to_string();

    if should_ignore(&raw_url) {
        tracing::debug!(request_id = %request_id, url = %raw_url, "Reserved url, not mockable");
        metrics::record_request(&method, 404, "none", start_time);
        return (StatusCode::NOT_FOUND, "Reserved path").into_response();
    }

    let route = match inner.router.match_path(request.uri().path()) {
        Some(r) => r.clone(),
        None => {
            tracing::warn!(request_id = %request_id, url = %raw_url, "No route matched");
            metrics::record_request(&method, 404, "none", start_time);
            return (StatusCode::NOT_FOUND, "No matching route found").into_response();
        }
    };
    let route_name = route.name.clone();

    let (parts, body) = request.into_parts();
    let body_bytes = match axum::body::to_bytes(body, inner.config.listener.max_body_size).await {
        Ok(bytes) => bytes,
        Err(e) => return error_response(&e),
    };

    let mock_req = build_mock_request(
        &parts,
        &body_bytes,
        route,
        inner.config.upstream.as_deref(),
    );
    let mock_path = resolve_mock_path(
        &mock_req,
        &inner.config.data_root,
        inner.config.verbose_paths,
    );

    if let Some(path) = &mock_path {
        match tokio::fs::read(path).await {
            Ok(bytes) => {
                tracing::debug!(
                    request_id = %request_id,
                    path = %path.display(),
                    "Serving mock"
                );
                metrics::record_mock_hit(&route_name);
                metrics::record_request(&method, 200, &route_name, start_time);
                let mut headers = axum::http::HeaderMap::new();
                headers.insert(
                    header::CONTENT_TYPE,
                    axum::http::HeaderValue::from_static("application/json"),
                );
                return passthru(StatusCode::OK, headers, bytes);
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return error_response(&e),
        }
    }

    metrics::record_mock_miss(&route_name);
    match &inner.config.upstream {
        Some(_) => {
            forward_upstream(
                &inner,
                parts,
                body_bytes,
                &mock_req.url_to_proxy,
                &request_id,
                &method,
                &route_name,
                start_time,
            )
            .await
        }
        None => {
            tracing::debug!(request_id = %request_id, url = %raw_url, "No mock recorded");
            metrics::record_request(&method, 404, &route_name, start_time);
            (StatusCode::NOT_FOUND, "No mock recorded for this request").into_response()
        }
    }
}

/// Forward a missed request to the live upstream.
#[allow(clippy::too_many_arguments)]
async fn forward_upstream(
    inner: &SharedState,
    parts: axum::http::request::Parts,
    body: axum::body::Bytes,
    target: &str,
    request_id: &str,
    method: &str,
    route_name: &str,
    start_time: Instant,
) -> Response<Body> {
    let uri: Uri = match target.parse() {
        Ok(uri) => uri,
        Err(e) => return error_response(&e),
    };

    let mut builder = Request::builder()
        .method(parts.method.clone())
        .uri(uri)
        .version(axum::http::Version::HTTP_11);
    if let Some(headers) = builder.headers_mut() {
        for (name, value) in parts.headers.iter() {
            if name != &header::HOST {
                headers.insert(name.clone(), value.clone());
            }
        }
    }
    let req = match builder.body(Body::from(body)) {
        Ok(req) => req,
        Err(e) => return error_response(&e),
    };

    match inner.client.request(req).await {
        Ok(response) => {
            let status = response.status();
            tracing::debug!(request_id = %request_id, status = %status, "Forwarded to upstream");
            metrics::record_request(method, status.as_u16(), route_name, start_time);
            let (parts, body) = response.into_parts();
            Response::from_parts(parts, Body::new(body))
        }
        Err(e) => {
            tracing::error!(request_id = %request_id, error = %e, "Upstream error");
            metrics::record_request(method, 502, route_name, start_time);
            (StatusCode::BAD_GATEWAY, "Upstream request failed").into_response()
        }
    }
}
