//! Metrics collection and exposition.
//!
//! # Responsibilities
//! - Define service metrics
//! - Expose Prometheus-compatible metrics endpoint
//!
//! # Metrics
//! - `traefik_host_operations_total` (counter): host operations by operation, outcome
//! - `traefik_store_requests_total` (counter): store calls by method, status
//!
//! # Design Decisions
//! - Recording is a no-op until the exporter is installed
//! - Labels are low-cardinality; hostnames are never used as labels

use std::net::SocketAddr;

use metrics_exporter_prometheus::PrometheusBuilder;

pub const HOST_OPERATIONS_TOTAL: &str = "traefik_host_operations_total";
pub const STORE_REQUESTS_TOTAL: &str = "traefik_store_requests_total";

/// Start the Prometheus exporter on its own listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => {
            metrics::describe_counter!(HOST_OPERATIONS_TOTAL, "Host operations by outcome");
            metrics::describe_counter!(STORE_REQUESTS_TOTAL, "Config store requests by status");
            tracing::info!(address = %addr, "Metrics endpoint listening");
        }
        Err(e) => {
            tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter");
        }
    }
}

pub fn record_host_operation(operation: &'static str, outcome: &'static str) {
    metrics::counter!(HOST_OPERATIONS_TOTAL, "operation" => operation, "outcome" => outcome)
        .increment(1);
}

/// `status` is the HTTP status code, or `error` for transport failures.
pub fn record_store_request(method: &'static str, status: &str) {
    metrics::counter!(STORE_REQUESTS_TOTAL, "method" => method, "status" => status.to_string())
        .increment(1);
}
