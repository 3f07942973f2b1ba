//! Call log domain model
//!
//! Records what happened after a call was prepared: who dialed whom and how
//! it ended. Storage belongs to whatever implements [`CallLogRecorder`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::shared::{CallId, DomainError, Result};

/// Default page size for call log queries
pub const DEFAULT_QUERY_LIMIT: usize = 100;

/// How a call attempt ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CallOutcome {
    /// Handed to a dialer, result unknown
    Initiated,
    Connected,
    NoAnswer,
    Busy,
    Failed,
    Cancelled,
}

impl CallOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            CallOutcome::Initiated => "initiated",
            CallOutcome::Connected => "connected",
            CallOutcome::NoAnswer => "no_answer",
            CallOutcome::Busy => "busy",
            CallOutcome::Failed => "failed",
            CallOutcome::Cancelled => "cancelled",
        }
    }
}

/// One recorded call attempt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallLogEntry {
    pub id: Uuid,
    /// Id returned by call preparation, when the attempt came through it
    pub call_id: Option<CallId>,
    pub user_id: String,
    pub contact_name: Option<String>,
    pub phone_number: String,
    pub outcome: CallOutcome,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl CallLogEntry {
    pub fn new(user_id: String, phone_number: String, outcome: CallOutcome) -> Self {
        Self {
            id: Uuid::new_v4(),
            call_id: None,
            user_id,
            contact_name: None,
            phone_number,
            outcome,
            notes: None,
            created_at: Utc::now(),
        }
    }

    pub fn with_call_id(mut self, call_id: CallId) -> Self {
        self.call_id = Some(call_id);
        self
    }

    pub fn with_contact_name(mut self, contact_name: String) -> Self {
        self.contact_name = Some(contact_name);
        self
    }

    pub fn with_notes(mut self, notes: String) -> Self {
        self.notes = Some(notes);
        self
    }

    /// Reject entries that can't be attributed to a user or number
    pub fn validate(&self) -> Result<()> {
        if self.user_id.trim().is_empty() {
            return Err(DomainError::ValidationError("user_id is required".to_string()));
        }
        if self.phone_number.trim().is_empty() {
            return Err(DomainError::ValidationError(
                "phone_number is required".to_string(),
            ));
        }
        Ok(())
    }

    /// Whether this entry satisfies every filter in `query`
    pub fn matches(&self, query: &CallLogQuery) -> bool {
        if let Some(contact) = query.contact.as_deref() {
            let needle = contact.to_lowercase();
            let found = self
                .contact_name
                .as_deref()
                .map(|name| name.to_lowercase().contains(&needle))
                .unwrap_or(false);
            if !found {
                return false;
            }
        }

        if let Some(from) = query.from {
            if self.created_at < from {
                return false;
            }
        }

        if let Some(to) = query.to {
            if self.created_at > to {
                return false;
            }
        }

        true
    }
}

/// Filters for call log queries
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallLogQuery {
    /// Case-insensitive substring of the contact name
    pub contact: Option<String>,
    /// Inclusive lower bound on `created_at`
    pub from: Option<DateTime<Utc>>,
    /// Inclusive upper bound on `created_at`
    pub to: Option<DateTime<Utc>>,
    pub limit: Option<usize>,
}

impl CallLogQuery {
    pub fn effective_limit(&self) -> usize {
        self.limit.unwrap_or(DEFAULT_QUERY_LIMIT)
    }
}

/// Call log store port
#[async_trait::async_trait]
pub trait CallLogRecorder: Send + Sync {
    /// Record a call attempt
    async fn record(&self, entry: CallLogEntry) -> Result<CallLogEntry>;

    /// Entries matching `query`, newest first
    async fn query(&self, query: CallLogQuery) -> Result<Vec<CallLogEntry>>;
}
