//! Call preparation model
//!
//! A [`CallDescriptor`] is request-scoped: it is built for one "prepare
//! call" invocation and handed back to the caller. Nothing here is persisted.

use serde::{Deserialize, Deserializer, Serialize};

use super::dial_strategy::{is_fallback_only, DialStrategy};
use super::phone::NormalizedPhone;
use super::shared::CallId;

/// Request to prepare an outbound call
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CallRequest {
    /// Raw, free-form phone number; missing or null reads as empty
    #[serde(default, deserialize_with = "null_as_empty")]
    pub phone_number: String,
    #[serde(default)]
    pub contact_name: Option<String>,
    #[serde(default)]
    pub extension: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub user_id: String,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

impl CallRequest {
    pub fn new(phone_number: impl Into<String>, user_id: impl Into<String>) -> Self {
        Self {
            phone_number: phone_number.into(),
            contact_name: None,
            extension: None,
            user_id: user_id.into(),
        }
    }

    pub fn with_contact_name(mut self, contact_name: impl Into<String>) -> Self {
        self.contact_name = Some(contact_name.into());
        self
    }

    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = Some(extension.into());
        self
    }
}

/// Outcome of a preparation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DescriptorStatus {
    /// Integration strategies are available ahead of the `tel:` fallback
    Ready,
    /// Only the device dialer can be used
    FallbackOnly,
    /// Input had no digits; the strategies are best effort
    Unresolved,
}

impl DescriptorStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DescriptorStatus::Ready => "ready",
            DescriptorStatus::FallbackOnly => "fallback_only",
            DescriptorStatus::Unresolved => "unresolved",
        }
    }

    pub fn classify(phone: &NormalizedPhone, strategies: &[DialStrategy]) -> Self {
        if !phone.is_dialable() {
            DescriptorStatus::Unresolved
        } else if is_fallback_only(strategies) {
            DescriptorStatus::FallbackOnly
        } else {
            DescriptorStatus::Ready
        }
    }
}

/// A prepared, ready-to-dial call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallDescriptor {
    pub call_id: CallId,
    pub normalized_phone: NormalizedPhone,
    /// Ordered by priority, never empty
    pub strategies: Vec<DialStrategy>,
    pub status: DescriptorStatus,
    pub message: String,
}

impl CallDescriptor {
    /// The URI of the first strategy
    pub fn dial_string(&self) -> Option<&str> {
        self.strategies.first().map(|s| s.uri.as_str())
    }

    pub fn is_dialable(&self) -> bool {
        self.status != DescriptorStatus::Unresolved
    }
}
