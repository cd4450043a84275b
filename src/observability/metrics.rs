//! Metrics collection and exposition.
//!
//! # Metrics
//! - `demo_http_requests_total` (counter): requests by method, path, status
//! - `demo_http_request_duration_seconds` (histogram): latency distribution
//! - `demo_chat_active_sessions` (gauge): open chat connections
//! - `demo_inference_requests_total` (counter): provider calls by outcome
//! - `demo_inference_duration_seconds` (histogram): provider latency
//! - `demo_records_created_total` (counter): records appended by store

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus exporter with its own HTTP listener.
///
/// Must be called from within a tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;

    describe_counter!("demo_http_requests_total", "Total HTTP requests by method, path and status");
    describe_histogram!("demo_http_request_duration_seconds", "HTTP request duration in seconds");
    describe_gauge!("demo_chat_active_sessions", "Currently open chat sessions");
    describe_counter!("demo_inference_requests_total", "Inference provider calls by outcome");
    describe_histogram!("demo_inference_duration_seconds", "Inference provider latency in seconds");
    describe_counter!("demo_records_created_total", "Records appended by store");

    tracing::info!(address = %addr, "Metrics exporter listening");
    Ok(())
}

pub fn record_request(method: &str, path: &str, status: u16, start: Instant) {
    counter!(
        "demo_http_requests_total",
        "method" => method.to_string(),
        "path" => path.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    histogram!(
        "demo_http_request_duration_seconds",
        "method" => method.to_string(),
        "path" => path.to_string()
    )
    .record(start.elapsed().as_secs_f64());
}

pub fn set_active_sessions(count: usize) {
    gauge!("demo_chat_active_sessions").set(count as f64);
}

/// `outcome` is `ok` or the error kind.
pub fn record_inference(outcome: &'static str, start: Instant) {
    counter!("demo_inference_requests_total", "outcome" => outcome).increment(1);
    histogram!("demo_inference_duration_seconds").record(start.elapsed().as_secs_f64());
}

pub fn record_created(store: &'static str) {
    counter!("demo_records_created_total", "store" => store).increment(1);
}
