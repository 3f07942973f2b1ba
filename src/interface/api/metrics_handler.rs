//! Prometheus metrics handler

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use metrics::{counter, describe_counter};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};

/// Install the global Prometheus recorder
pub fn init_metrics() -> Result<PrometheusHandle, BuildError> {
    let handle = PrometheusBuilder::new().install_recorder()?;

    describe_counter!(
        "calls_prepared_total",
        "Total number of prepared outbound calls"
    );
    describe_counter!(
        "integration_status_checks_total",
        "Total number of provider status checks"
    );
    describe_counter!(
        "call_log_entries_total",
        "Total number of recorded call attempts"
    );

    Ok(handle)
}

/// HTTP metrics handler
pub async fn metrics_handler(State(prometheus_handle): State<PrometheusHandle>) -> Response {
    (StatusCode::OK, prometheus_handle.render()).into_response()
}

/// Record a call preparation by descriptor status
pub fn record_call_prepared(status: &str) {
    counter!("calls_prepared_total", "status" => status.to_string()).increment(1);
}

/// Record a status check by capability level
pub fn record_status_check(level: &str) {
    counter!("integration_status_checks_total", "level" => level.to_string()).increment(1);
}

/// Record a call log entry by outcome
pub fn record_call_logged(outcome: &str) {
    counter!("call_log_entries_total", "outcome" => outcome.to_string()).increment(1);
}
