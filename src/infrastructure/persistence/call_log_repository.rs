//! In-memory implementation of the call log store

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::domain::call_log::{CallLogEntry, CallLogQuery, CallLogRecorder};
use crate::domain::Result;

/// Entries kept before the oldest are dropped
pub const DEFAULT_RETENTION: usize = 10_000;

/// Keeps the most recent entries for the lifetime of the process
#[derive(Clone)]
pub struct InMemoryCallLog {
    entries: Arc<RwLock<VecDeque<CallLogEntry>>>,
    retention: usize,
}

impl Default for InMemoryCallLog {
    fn default() -> Self {
        Self::with_retention(DEFAULT_RETENTION)
    }
}

impl InMemoryCallLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Retain at most `retention` entries (at least one)
    pub fn with_retention(retention: usize) -> Self {
        Self {
            entries: Arc::new(RwLock::new(VecDeque::new())),
            retention: retention.max(1),
        }
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl CallLogRecorder for InMemoryCallLog {
    async fn record(&self, entry: CallLogEntry) -> Result<CallLogEntry> {
        entry.validate()?;

        info!(
            "Recording call log entry {} for user {} ({})",
            entry.id,
            entry.user_id,
            entry.outcome.as_str()
        );
        let mut entries = self.entries.write().await;
        entries.push_back(entry.clone());
        while entries.len() > self.retention {
            if let Some(dropped) = entries.pop_front() {
                debug!("Call log full, dropping oldest entry {}", dropped.id);
            }
        }

        Ok(entry)
    }

    async fn query(&self, query: CallLogQuery) -> Result<Vec<CallLogEntry>> {
        let entries = self.entries.read().await;

        let mut matched: Vec<CallLogEntry> = entries
            .iter()
            .filter(|entry| entry.matches(&query))
            .cloned()
            .collect();
        matched.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        matched.truncate(query.effective_limit());

        debug!("Call log query {:?} matched {} entries", query, matched.len());
        Ok(matched)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::call_log::CallOutcome;
    use crate::domain::DomainError;
    use chrono::{Duration, Utc};

    fn entry(contact: &str, minutes_ago: i64) -> CallLogEntry {
        let mut entry = CallLogEntry::new(
            "user-1".to_string(),
            "18778406250".to_string(),
            CallOutcome::Connected,
        )
        .with_contact_name(contact.to_string());
        entry.created_at = Utc::now() - Duration::minutes(minutes_ago);
        entry
    }

    #[tokio::test]
    async fn test_record_and_query_newest_first() {
        let log = InMemoryCallLog::new();
        log.record(entry("Jane Doe", 30)).await.unwrap();
        log.record(entry("John Smith", 10)).await.unwrap();
        log.record(entry("Janet Roe", 20)).await.unwrap();

        assert_eq!(log.len().await, 3);

        let all = log.query(CallLogQuery::default()).await.unwrap();
        let names: Vec<&str> = all.iter().filter_map(|e| e.contact_name.as_deref()).collect();
        assert_eq!(names, vec!["John Smith", "Janet Roe", "Jane Doe"]);
    }

    #[tokio::test]
    async fn test_query_by_contact_and_range() {
        let log = InMemoryCallLog::new();
        log.record(entry("Jane Doe", 120)).await.unwrap();
        log.record(entry("Janet Roe", 5)).await.unwrap();
        log.record(entry("John Smith", 5)).await.unwrap();

        let query = CallLogQuery {
            contact: Some("JANE".to_string()),
            from: Some(Utc::now() - Duration::minutes(60)),
            to: Some(Utc::now()),
            limit: None,
        };
        let matched = log.query(query).await.unwrap();

        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].contact_name.as_deref(), Some("Janet Roe"));
    }

    #[tokio::test]
    async fn test_query_limit() {
        let log = InMemoryCallLog::new();
        for minutes in 0..5 {
            log.record(entry("Jane", minutes)).await.unwrap();
        }

        let query = CallLogQuery {
            limit: Some(2),
            ..Default::default()
        };
        assert_eq!(log.query(query).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_retention_drops_oldest_recorded() {
        let log = InMemoryCallLog::with_retention(2);
        log.record(entry("First", 3)).await.unwrap();
        log.record(entry("Second", 2)).await.unwrap();
        log.record(entry("Third", 1)).await.unwrap();

        assert_eq!(log.len().await, 2);
        let names: Vec<String> = log
            .query(CallLogQuery::default())
            .await
            .unwrap()
            .into_iter()
            .filter_map(|e| e.contact_name)
            .collect();
        assert_eq!(names, vec!["Third", "Second"]);
    }

    #[tokio::test]
    async fn test_invalid_entry_is_rejected() {
        let log = InMemoryCallLog::new();
        let entry = CallLogEntry::new(String::new(), "1".to_string(), CallOutcome::Failed);

        let result = log.record(entry).await;
        assert!(matches!(result, Err(DomainError::ValidationError(_))));
        assert!(log.is_empty().await);
    }
}
