//! Provider connectivity reporting
//!
//! Each status query walks `Unconfigured -> Probing -> {Connected, Offline}`
//! from scratch. Nothing is cached between queries and nothing is retried:
//! connectivity can change between user actions, so callers poll on demand.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

use super::shared::{DomainError, IntegrationCredentials};

/// Default bound on a single liveness probe
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// Coarse connectivity tier reported to callers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CapabilityLevel {
    /// Provider reachable, every strategy available
    Full,
    /// Provider reachable but the account can't sign dialer links
    Limited,
    /// Provider unreachable or credentials absent
    Offline,
}

impl CapabilityLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            CapabilityLevel::Full => "full",
            CapabilityLevel::Limited => "limited",
            CapabilityLevel::Offline => "offline",
        }
    }
}

/// Result of a status query
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntegrationStatus {
    pub connected: bool,
    pub capability_level: CapabilityLevel,
    pub account_id: Option<String>,
    pub message: String,
}

impl IntegrationStatus {
    pub fn offline(account_id: Option<String>, message: impl Into<String>) -> Self {
        Self {
            connected: false,
            capability_level: CapabilityLevel::Offline,
            account_id,
            message: message.into(),
        }
    }
}

/// Liveness probe failure
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProbeError {
    #[error("Health check timed out after {}ms", .0.as_millis())]
    Timeout(Duration),

    #[error("Provider health endpoint returned HTTP {0}")]
    HttpStatus(u16),

    #[error("{0}")]
    Request(String),
}

/// Port to the provider's health endpoint
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HealthProbe: Send + Sync {
    /// Returns the 2xx status code on success
    async fn probe(&self) -> Result<u16, ProbeError>;
}

/// Classifies provider connectivity for the current configuration.
pub struct StatusReporter {
    credentials: IntegrationCredentials,
    probe: Option<Arc<dyn HealthProbe>>,
    timeout: Duration,
}

impl StatusReporter {
    pub fn new(credentials: IntegrationCredentials, probe: Option<Arc<dyn HealthProbe>>) -> Self {
        Self {
            credentials,
            probe,
            timeout: DEFAULT_PROBE_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Probe the provider and classify the result. Never fails.
    pub async fn get_status(&self) -> IntegrationStatus {
        let account_id = self.credentials.account_id().map(str::to_string);

        match self.check().await {
            Ok(code) => {
                info!("Provider health probe succeeded with HTTP {}", code);
                if account_id.is_some() {
                    IntegrationStatus {
                        connected: true,
                        capability_level: CapabilityLevel::Full,
                        account_id,
                        message: "Connected to telephony provider".to_string(),
                    }
                } else {
                    IntegrationStatus {
                        connected: true,
                        capability_level: CapabilityLevel::Limited,
                        account_id,
                        message: "Connected, but account_id is not configured; only device dialing is available"
                            .to_string(),
                    }
                }
            }
            Err(DomainError::ConfigurationMissing(missing)) => {
                debug!("Integration unconfigured: {}", missing);
                IntegrationStatus::offline(
                    account_id,
                    format!("Telephony credentials not configured: {}", missing),
                )
            }
            Err(DomainError::NetworkUnavailable(reason)) => {
                warn!("Provider health probe failed: {}", reason);
                IntegrationStatus::offline(account_id, reason)
            }
            Err(e) => {
                warn!("Provider status check failed: {}", e);
                IntegrationStatus::offline(account_id, e.to_string())
            }
        }
    }

    async fn check(&self) -> Result<u16, DomainError> {
        if !self.credentials.is_configured() {
            return Err(DomainError::ConfigurationMissing(
                self.credentials.missing().join(", "),
            ));
        }

        let probe = self.probe.as_ref().ok_or_else(|| {
            DomainError::ConfigurationMissing("provider health endpoint".to_string())
        })?;

        match tokio::time::timeout(self.timeout, probe.probe()).await {
            Ok(Ok(code)) => Ok(code),
            Ok(Err(e)) => Err(DomainError::NetworkUnavailable(e.to_string())),
            Err(_) => Err(DomainError::NetworkUnavailable(
                ProbeError::Timeout(self.timeout).to_string(),
            )),
        }
    }
}
