use axum::{extract::State, Json};
use serde::Serialize;
use std::sync::atomic::Ordering;

use crate::config::RouteConfig;
use crate::http::server::AppState;

#[derive(Serialize)]
pub struct SystemStatus {
    pub version: &'static str,
    pub status: &'static str,
    pub requests_served: usize,
    pub data_root: String,
    pub upstream: Option<String>,
}

pub async fn get_status(State(state): State<AppState>) -> Json<SystemStatus> {
    let inner = state.inner.load_full();
    Json(SystemStatus {
        version: env!("CARGO_PKG_VERSION"),
        status: "operational",
        requests_served: inner.request_count.load(Ordering::Relaxed),
        data_root: inner.config.data_root.display().to_string(),
        upstream: inner.config.upstream.clone(),
    })
}

pub async fn get_routes(State(state): State<AppState>) -> Json<Vec<RouteConfig>> {
    let inner = state.inner.load_full();
    Json(inner.router.routes().to_vec())
}
