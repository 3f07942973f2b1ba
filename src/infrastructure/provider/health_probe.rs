//! HTTP liveness probe against the provider's health endpoint

use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

use crate::domain::integration_status::{HealthProbe, ProbeError, DEFAULT_PROBE_TIMEOUT};

/// Issues a single bounded GET per probe. No retries.
pub struct HttpHealthProbe {
    client: reqwest::Client,
    url: String,
    timeout: Duration,
}

impl HttpHealthProbe {
    pub fn new(url: impl Into<String>) -> Result<Self, ProbeError> {
        Self::with_timeout(url, DEFAULT_PROBE_TIMEOUT)
    }

    pub fn with_timeout(url: impl Into<String>, timeout: Duration) -> Result<Self, ProbeError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .build()
            .map_err(|e| ProbeError::Request(e.to_string()))?;

        Ok(Self {
            client,
            url: url.into(),
            timeout,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl HealthProbe for HttpHealthProbe {
    async fn probe(&self) -> Result<u16, ProbeError> {
        debug!("Probing provider health at {}", self.url);

        let response = self.client.get(&self.url).send().await.map_err(|e| {
            if e.is_timeout() {
                ProbeError::Timeout(self.timeout)
            } else {
                ProbeError::Request(e.to_string())
            }
        })?;

        let status = response.status();
        if status.is_success() {
            Ok(status.as_u16())
        } else {
            Err(ProbeError::HttpStatus(status.as_u16()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_does_not_panic() {
        let probe = HttpHealthProbe::new("https://dialer.example.com/health").unwrap();
        assert_eq!(probe.url(), "https://dialer.example.com/health");
    }

    #[tokio::test]
    async fn test_invalid_url_is_request_error() {
        let probe = HttpHealthProbe::new("://bad").unwrap();
        let err = probe.probe().await.unwrap_err();
        assert!(matches!(err, ProbeError::Request(_)));
        assert!(!err.to_string().is_empty());
    }
}
