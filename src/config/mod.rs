//! Configuration management
//!
//! Layers, lowest precedence first: built-in defaults, an optional
//! `config/ringout.toml`, then `RINGOUT_*` environment variables with `__`
//! between nested keys (`RINGOUT_TELEPHONY__API_KEY`).

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::domain::auth_token::{DEFAULT_SAFETY_MARGIN_SECS, DEFAULT_TOKEN_LIFETIME_SECS};
use crate::domain::dial_strategy::ResolverSettings;
use crate::domain::phone::NormalizedPhone;
use crate::domain::shared::{non_blank, IntegrationCredentials};

const CONFIG_FILE: &str = "config/ringout";
const ENV_PREFIX: &str = "RINGOUT";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub telephony: TelephonyConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Provider integration settings. Every credential is optional; missing
/// ones lower the capability level instead of failing startup.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TelephonyConfig {
    pub api_key: Option<String>,
    pub shared_secret: Option<String>,
    pub account_id: Option<String>,
    /// Business number used as caller id on the web dialer
    pub fallback_phone: Option<String>,
    /// Provider host, e.g. `dialer.example.com`
    pub provider_domain: Option<String>,
    pub sip_domain: Option<String>,
    /// Overrides `https://{provider_domain}/health`
    pub health_url: Option<String>,
    pub token_lifetime_secs: i64,
    pub token_safety_margin_secs: i64,
    pub probe_timeout_ms: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl Default for TelephonyConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            shared_secret: None,
            account_id: None,
            fallback_phone: None,
            provider_domain: None,
            sip_domain: None,
            health_url: None,
            token_lifetime_secs: DEFAULT_TOKEN_LIFETIME_SECS,
            token_safety_margin_secs: DEFAULT_SAFETY_MARGIN_SECS,
            probe_timeout_ms: 5000,
        }
    }
}

// Secrets stay out of startup logs
impl std::fmt::Debug for TelephonyConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelephonyConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<set>"))
            .field("shared_secret", &self.shared_secret.as_ref().map(|_| "<set>"))
            .field("account_id", &self.account_id)
            .field("fallback_phone", &self.fallback_phone)
            .field("provider_domain", &self.provider_domain)
            .field("sip_domain", &self.sip_domain)
            .field("health_url", &self.health_url)
            .field("token_lifetime_secs", &self.token_lifetime_secs)
            .field("token_safety_margin_secs", &self.token_safety_margin_secs)
            .field("probe_timeout_ms", &self.probe_timeout_ms)
            .finish()
    }
}

impl Config {
    /// Load defaults, the optional config file and the environment
    pub fn load() -> Result<Self, ::config::ConfigError> {
        Self::load_from(CONFIG_FILE)
    }

    /// Same as [`Config::load`] with an explicit file path (extension optional)
    pub fn load_from(file: &str) -> Result<Self, ::config::ConfigError> {
        ::config::Config::builder()
            .add_source(::config::File::with_name(file).required(false))
            .add_source(
                ::config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .ignore_empty(true),
            )
            .build()?
            .try_deserialize()
    }
}

impl TelephonyConfig {
    pub fn credentials(&self) -> IntegrationCredentials {
        IntegrationCredentials::new(
            self.api_key.clone(),
            self.shared_secret.clone(),
            self.account_id.clone(),
        )
    }

    pub fn resolver_settings(&self) -> ResolverSettings {
        ResolverSettings {
            credentials: self.credentials(),
            provider_domain: non_blank(self.provider_domain.clone()),
            sip_domain: non_blank(self.sip_domain.clone()),
            fallback_phone: non_blank(self.fallback_phone.clone())
                .map(|phone| NormalizedPhone::parse(&phone)),
        }
    }

    /// Explicit `health_url`, else derived from the provider domain
    pub fn health_url(&self) -> Option<String> {
        if let Some(url) = non_blank(self.health_url.clone()) {
            return Some(url);
        }

        non_blank(self.provider_domain.clone()).map(|domain| {
            let base = if domain.contains("://") {
                domain
            } else {
                format!("https://{}", domain)
            };
            format!("{}/health", base.trim_end_matches('/'))
        })
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_millis(self.probe_timeout_ms)
    }
}
