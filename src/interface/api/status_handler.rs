//! Integration status and liveness handlers

use super::dto::ApiResponse;
use super::metrics_handler::record_status_check;
use super::router::AppState;
use crate::domain::integration_status::IntegrationStatus;
use axum::{extract::State, Json};
use tracing::info;

/// Probe the telephony provider. Always 200; failures are in the body.
pub async fn get_integration_status(State(state): State<AppState>) -> Json<IntegrationStatus> {
    info!("API: Checking integration status");

    let status = state.status_reporter.get_status().await;
    record_status_check(status.capability_level.as_str());

    Json(status)
}

/// Health check endpoint
pub async fn health_check() -> Json<ApiResponse<&'static str>> {
    Json(ApiResponse::success("OK"))
}
