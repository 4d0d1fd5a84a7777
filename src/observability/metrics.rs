//! Metrics collection and exposition.
//!
//! # Metrics
//! - `log_ingest_http_requests_total` (counter): requests by method, path, status
//! - `log_ingest_http_request_duration_seconds` (histogram): inbound latency
//! - `log_ingest_store_operations_total` (counter): store calls by operation, outcome
//! - `log_ingest_store_operation_duration_seconds` (histogram): store latency
//!
//! Recording is a no-op until `init_metrics` installs the exporter.

use std::net::SocketAddr;
use std::time::Instant;

use axum::{extract::MatchedPath, http::Request, middleware::Next, response::Response};
use metrics::{counter, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus recorder and its scrape listener.
///
/// Must run inside a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

/// Record one inbound request.
pub fn record_request(method: &str, path: &str, status: u16, start: Instant) {
    counter!(
        "log_ingest_http_requests_total",
        "method" => method.to_string(),
        "path" => path.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    histogram!(
        "log_ingest_http_request_duration_seconds",
        "method" => method.to_string(),
        "path" => path.to_string()
    )
    .record(start.elapsed().as_secs_f64());
}

/// Record one store call.
pub fn record_store_operation(operation: &'static str, outcome: &'static str, start: Instant) {
    counter!(
        "log_ingest_store_operations_total",
        "operation" => operation,
        "outcome" => outcome
    )
    .increment(1);
    histogram!(
        "log_ingest_store_operation_duration_seconds",
        "operation" => operation
    )
    .record(start.elapsed().as_secs_f64());
}

/// Middleware recording every matched request. Install with `route_layer`
/// so `MatchedPath` is present.
pub async fn track_requests(request: Request<axum::body::Body>, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().to_string();
    let path = request
        .extensions()
        .get::<MatchedPath>()
        .map(|matched| matched.as_str().to_string())
        .unwrap_or_else(|| "unmatched".to_string());

    let response = next.run(request).await;
    record_request(&method, &path, response.status().as_u16(), start);
    response
}
