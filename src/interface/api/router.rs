//! API Router configuration

use super::calls_handler::{list_call_log, prepare_call, record_call};
use super::metrics_handler::metrics_handler;
use super::status_handler::{get_integration_status, health_check};
use crate::application::CallPreparationService;
use crate::domain::call_log::CallLogRecorder;
use crate::domain::integration_status::StatusReporter;
use axum::{
    routing::{get, post},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Services shared by the handlers
#[derive(Clone)]
pub struct AppState {
    pub call_preparation: Arc<CallPreparationService>,
    pub status_reporter: Arc<StatusReporter>,
    pub call_log: Arc<dyn CallLogRecorder>,
}

/// Build the API router
pub fn build_router(state: AppState, prometheus_handle: PrometheusHandle) -> Router {
    // Health check route (no auth required)
    let health_routes = Router::new().route("/health", get(health_check));

    // Call routes
    let call_routes = Router::new()
        .route("/calls/prepare", post(prepare_call))
        .route("/calls/log", post(record_call).get(list_call_log));

    // Integration routes
    let integration_routes =
        Router::new().route("/integration/status", get(get_integration_status));

    // Metrics route (separate state)
    let metrics_routes = Router::new()
        .route("/metrics", get(metrics_handler))
        .with_state(prometheus_handle);

    // Combine routes with state
    Router::new()
        .merge(health_routes)
        .merge(call_routes)
        .merge(integration_routes)
        .with_state(state)
        .merge(metrics_routes)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}
