//! Metrics collection and exposition.
//!
//! # Metrics
//! - `iln_requests_total` (counter): requests by method, route, status
//! - `iln_request_duration_seconds` (histogram): latency per route
//! - `iln_essence_fallbacks_total` (counter): accelerated backend failures
//! - `iln_stress_iterations_total` (counter): stress-test rounds executed
//! - `iln_monitoring_sessions` (gauge): open monitoring websockets

use std::net::SocketAddr;
use std::time::Instant;

use axum::{
    body::Body,
    extract::MatchedPath,
    http::Request,
    middleware::Next,
    response::Response,
};
use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus recorder with its own HTTP listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Prometheus exporter listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install Prometheus exporter"),
    }
}

pub fn record_request(method: &str, route: &str, status: u16, start: Instant) {
    let labels = [
        ("method", method.to_string()),
        ("route", route.to_string()),
        ("status", status.to_string()),
    ];
    counter!("iln_requests_total", &labels).increment(1);
    histogram!("iln_request_duration_seconds", "route" => route.to_string())
        .record(start.elapsed().as_secs_f64());
}

pub fn record_fallback(essence: &'static str) {
    counter!("iln_essence_fallbacks_total", "essence" => essence).increment(1);
}

pub fn record_stress_iterations(iterations: u32) {
    counter!("iln_stress_iterations_total").increment(u64::from(iterations));
}

pub fn monitoring_session_opened() {
    gauge!("iln_monitoring_sessions").increment(1.0);
}

pub fn monitoring_session_closed() {
    gauge!("iln_monitoring_sessions").decrement(1.0);
}

/// Middleware recording request count and latency per matched route.
pub async fn track_requests(request: Request<Body>, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().to_string();
    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| "unmatched".to_string());

    let response = next.run(request).await;
    record_request(&method, &route, response.status().as_u16(), start);
    response
}
