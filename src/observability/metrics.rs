//! Metrics collection and exposition.
//!
//! # Metrics
//! - `mock_proxy_requests_total` (counter): requests by method, status, route
//! - `mock_proxy_request_duration_seconds` (histogram): latency by route
//! - `mock_proxy_mock_hits_total` / `mock_proxy_mock_misses_total`
//!   (counters): lookup outcomes by route
//!
//! # Design Decisions
//! - Recording is cheap and never fails; an uninstalled exporter turns
//!   every record into a no-op

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter on its own listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter started"),
        Err(e) => tracing::error!(error = %e, "Failed to start metrics exporter"),
    }
}

/// Record one handled request.
pub fn record_request(method: &str, status: u16, route: &str, start: Instant) {
    metrics::counter!(
        "mock_proxy_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string(),
        "route" => route.to_string()
    )
    .increment(1);
    metrics::histogram!("mock_proxy_request_duration_seconds", "route" => route.to_string())
        .record(start.elapsed().as_secs_f64());
}

/// Record a mock file found on disk.
pub fn record_mock_hit(route: &str) {
    metrics::counter!("mock_proxy_mock_hits_total", "route" => route.to_string()).increment(1);
}

/// Record a lookup that found nothing.
pub fn record_mock_miss(route: &str) {
    metrics::counter!("mock_proxy_mock_misses_total", "route" => route.to_string()).increment(1);
}
