//! Call preparation and call log API handlers

use super::dto::{ApiResponse, CallLogListQuery, PrepareCallResponse, RecordCallRequest};
use super::metrics_handler::{record_call_logged, record_call_prepared};
use super::router::AppState;
use crate::domain::call::CallRequest;
use crate::domain::call_log::CallLogEntry;
use crate::domain::DomainError;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use tracing::{error, info, warn};

/// Prepare an outbound call
pub async fn prepare_call(
    State(state): State<AppState>,
    Json(request): Json<CallRequest>,
) -> Json<PrepareCallResponse> {
    info!("API: Preparing call for user {:?}", request.user_id);

    let prepared = state.call_preparation.prepare_call(&request);
    record_call_prepared(prepared.descriptor.status.as_str());

    Json(PrepareCallResponse::from(prepared))
}

/// Record the outcome of a call attempt
pub async fn record_call(
    State(state): State<AppState>,
    Json(request): Json<RecordCallRequest>,
) -> (StatusCode, Json<ApiResponse<CallLogEntry>>) {
    info!("API: Recording call for user {:?}", request.user_id);

    match state.call_log.record(CallLogEntry::from(request)).await {
        Ok(entry) => {
            record_call_logged(entry.outcome.as_str());
            (StatusCode::CREATED, Json(ApiResponse::success(entry)))
        }
        Err(DomainError::ValidationError(message)) => {
            warn!("API: Rejected call log entry: {}", message);
            (StatusCode::BAD_REQUEST, Json(ApiResponse::error(message)))
        }
        Err(e) => {
            error!("API: Failed to record call: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error(e.to_string())),
            )
        }
    }
}

/// List call log entries by contact substring and date range
pub async fn list_call_log(
    State(state): State<AppState>,
    Query(query): Query<CallLogListQuery>,
) -> Result<Json<ApiResponse<Vec<CallLogEntry>>>, StatusCode> {
    info!("API: Listing call log with query: {:?}", query);

    match state.call_log.query(query.into()).await {
        Ok(entries) => Ok(Json(ApiResponse::success(entries))),
        Err(e) => {
            error!("API: Failed to query call log: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}
