//! Shared value objects used across multiple bounded contexts

use chrono::Utc;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

const CALL_ID_SUFFIX_LEN: usize = 9;
const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Call identifier
///
/// Correlates a prepared call with the outcome logged later. Built from the
/// wall-clock milliseconds and a random base36 suffix, e.g.
/// `call_1718000000000_k3j9x0a2b`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CallId(String);

impl CallId {
    pub fn new() -> Self {
        let mut rng = rand::thread_rng();
        let suffix: String = (0..CALL_ID_SUFFIX_LEN)
            .map(|_| BASE36[rng.gen_range(0..BASE36.len())] as char)
            .collect();

        Self(format!("call_{}_{}", Utc::now().timestamp_millis(), suffix))
    }

    pub fn from_string(value: String) -> Self {
        Self(value)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for CallId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for CallId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Provider credentials as injected at construction.
///
/// Blank values are stored as `None` so every consumer sees one notion of
/// "absent".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IntegrationCredentials {
    api_key: Option<String>,
    shared_secret: Option<String>,
    account_id: Option<String>,
}

impl IntegrationCredentials {
    pub fn new(
        api_key: Option<String>,
        shared_secret: Option<String>,
        account_id: Option<String>,
    ) -> Self {
        Self {
            api_key: non_blank(api_key),
            shared_secret: non_blank(shared_secret),
            account_id: non_blank(account_id),
        }
    }

    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    pub fn shared_secret(&self) -> Option<&str> {
        self.shared_secret.as_deref()
    }

    pub fn account_id(&self) -> Option<&str> {
        self.account_id.as_deref()
    }

    /// API key and shared secret are both present.
    pub fn is_configured(&self) -> bool {
        self.api_key.is_some() && self.shared_secret.is_some()
    }

    /// Names of the signing credentials that are absent.
    pub fn missing(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.api_key.is_none() {
            missing.push("api_key");
        }
        if self.shared_secret.is_none() {
            missing.push("shared_secret");
        }
        missing
    }
}

/// Treats empty and whitespace-only strings as absent.
pub fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
