//! API DTOs

use crate::application::PreparedCall;
use crate::domain::call_log::{CallLogEntry, CallLogQuery, CallOutcome, DEFAULT_QUERY_LIMIT};
use crate::domain::dial_strategy::DialStrategy;
use crate::domain::phone::NormalizedPhone;
use crate::domain::shared::CallId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Upper bound on `limit` for call log listing
pub const MAX_QUERY_LIMIT: usize = 1000;

/// Prepare-call response
#[derive(Debug, Serialize, Deserialize)]
pub struct PrepareCallResponse {
    pub success: bool,
    pub call_id: String,
    pub strategies: Vec<DialStrategy>,
    /// URI of the highest-priority strategy
    pub dial_string: Option<String>,
    pub display_number: String,
    pub canonical_number: String,
    pub message: String,
    pub status: String,
    pub instructions: Vec<String>,
}

impl From<PreparedCall> for PrepareCallResponse {
    fn from(prepared: PreparedCall) -> Self {
        let success = prepared.success();
        let descriptor = prepared.descriptor;
        let dial_string = descriptor.dial_string().map(str::to_string);

        PrepareCallResponse {
            success,
            call_id: descriptor.call_id.to_string(),
            strategies: descriptor.strategies,
            dial_string,
            display_number: descriptor.normalized_phone.display,
            canonical_number: descriptor.normalized_phone.canonical,
            message: descriptor.message,
            status: descriptor.status.as_str().to_string(),
            instructions: prepared.instructions,
        }
    }
}

/// Body of `POST /calls/log`
#[derive(Debug, Serialize, Deserialize)]
pub struct RecordCallRequest {
    #[serde(default)]
    pub call_id: Option<String>,
    pub user_id: String,
    #[serde(default)]
    pub contact_name: Option<String>,
    pub phone_number: String,
    #[serde(default = "default_outcome")]
    pub outcome: CallOutcome,
    #[serde(default)]
    pub notes: Option<String>,
}

fn default_outcome() -> CallOutcome {
    CallOutcome::Initiated
}

impl From<RecordCallRequest> for CallLogEntry {
    fn from(request: RecordCallRequest) -> Self {
        let phone = NormalizedPhone::parse(&request.phone_number);
        let phone_number = if phone.is_dialable() {
            phone.canonical
        } else {
            request.phone_number
        };

        let mut entry = CallLogEntry::new(request.user_id, phone_number, request.outcome);
        if let Some(call_id) = request.call_id.filter(|id| !id.trim().is_empty()) {
            entry = entry.with_call_id(CallId::from_string(call_id));
        }
        if let Some(contact_name) = request.contact_name.filter(|name| !name.trim().is_empty()) {
            entry = entry.with_contact_name(contact_name);
        }
        if let Some(notes) = request.notes.filter(|notes| !notes.trim().is_empty()) {
            entry = entry.with_notes(notes);
        }
        entry
    }
}

/// Query string of `GET /calls/log`
#[derive(Debug, Default, Deserialize)]
pub struct CallLogListQuery {
    pub contact: Option<String>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
    pub limit: Option<usize>,
}

impl From<CallLogListQuery> for CallLogQuery {
    fn from(query: CallLogListQuery) -> Self {
        CallLogQuery {
            contact: query.contact.filter(|c| !c.trim().is_empty()),
            from: query.from,
            to: query.to,
            limit: Some(query.limit.unwrap_or(DEFAULT_QUERY_LIMIT).min(MAX_QUERY_LIMIT)),
        }
    }
}

/// Generic API response wrapper
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: String) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message),
        }
    }
}
