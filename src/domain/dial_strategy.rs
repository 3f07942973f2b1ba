//! Dial strategy resolution
//!
//! Builds the ordered list of ways a prepared call can be placed, most
//! automatable first. Every strategy ends in a human action (clicking a
//! link, answering a softphone, tapping a dialer), so falling back from one
//! to the next is the caller's choice at presentation time.
//!
//! The `tel:` strategy needs nothing but the number and is always present;
//! the other two appear only when the integration is configured.

use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::debug;

use super::auth_token::{sign, AuthToken, Clock, SystemClock};
use super::phone::NormalizedPhone;
use super::shared::{DomainError, IntegrationCredentials, Result};

const WEB_DIALER_PATH: &str = "dial";

/// How a strategy places the call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StrategyKind {
    /// Provider-hosted click-to-dial page in a browser tab
    WebDialer,
    /// VoIP softphone via a SIP URI
    Sip,
    /// Local device dialer via a `tel:` URI
    DirectTel,
}

impl StrategyKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StrategyKind::WebDialer => "web-dialer",
            StrategyKind::Sip => "sip",
            StrategyKind::DirectTel => "direct-tel",
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One concrete way to place a call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialStrategy {
    pub kind: StrategyKind,
    pub uri: String,
    /// 1 is tried first
    pub priority: u8,
}

/// Everything the resolver needs to know about the call being prepared
#[derive(Debug, Clone, Copy)]
pub struct DialTarget<'a> {
    pub phone: &'a NormalizedPhone,
    pub contact_name: Option<&'a str>,
    pub extension: Option<&'a str>,
}

/// Account context the resolver signs and addresses strategies with
#[derive(Debug, Clone, Default)]
pub struct ResolverSettings {
    pub credentials: IntegrationCredentials,
    /// Host (or base URL) of the provider's web dialer
    pub provider_domain: Option<String>,
    /// SIP domain of the account; the provider host is used when absent
    pub sip_domain: Option<String>,
    /// Business number shown as caller id on the web dialer
    pub fallback_phone: Option<NormalizedPhone>,
}

/// Produces ordered dial strategies for a normalized number.
pub struct StrategyResolver {
    settings: ResolverSettings,
    clock: Arc<dyn Clock>,
}

impl StrategyResolver {
    pub fn new(settings: ResolverSettings) -> Self {
        Self {
            settings,
            clock: Arc::new(SystemClock),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn settings(&self) -> &ResolverSettings {
        &self.settings
    }

    /// Resolve strategies in priority order. Never empty.
    pub fn resolve(&self, target: DialTarget<'_>, token: &AuthToken) -> Vec<DialStrategy> {
        let mut uris: Vec<(StrategyKind, String)> = Vec::with_capacity(3);

        match self.web_dialer_uri(target, token) {
            Ok(uri) => uris.push((StrategyKind::WebDialer, uri)),
            Err(e) => debug!("Skipping web dialer strategy: {}", e),
        }

        match self.sip_uri(target.phone) {
            Ok(uri) => uris.push((StrategyKind::Sip, uri)),
            Err(e) => debug!("Skipping SIP strategy: {}", e),
        }

        uris.push((
            StrategyKind::DirectTel,
            tel_uri(&target.phone.canonical, target.extension),
        ));

        uris.into_iter()
            .enumerate()
            .map(|(index, (kind, uri))| DialStrategy {
                kind,
                uri,
                priority: index as u8 + 1,
            })
            .collect()
    }

    /// Provider-hosted dialer link carrying a signature over
    /// `account:number:timestamp`.
    pub fn web_dialer_uri(&self, target: DialTarget<'_>, token: &AuthToken) -> Result<String> {
        let secret = self.signing_secret()?;
        let account_id = self.account_id()?;
        let domain = self.settings.provider_domain.as_deref().ok_or_else(|| {
            DomainError::ConfigurationMissing("provider_domain".to_string())
        })?;
        require_dialable(target.phone)?;

        let number = target.phone.canonical.as_str();
        let timestamp = self.clock.now().timestamp().to_string();
        let signature = sign(secret, &format!("{}:{}:{}", account_id, number, timestamp));

        let mut params: Vec<(&str, &str)> = vec![("number", number)];
        if let Some(contact) = target.contact_name.filter(|c| !c.trim().is_empty()) {
            params.push(("contact", contact.trim()));
        }
        params.push(("account", account_id));
        if let Some(from) = self.settings.fallback_phone.as_ref().filter(|p| p.is_dialable()) {
            params.push(("from", from.canonical.as_str()));
        }
        params.push(("ts", timestamp.as_str()));
        params.push(("sig", signature.as_str()));
        params.push(("auth", token.value.as_str()));

        let base = base_url(domain)?;
        let mut url = base
            .join(WEB_DIALER_PATH)
            .map_err(|e| DomainError::ValidationError(format!("invalid provider domain: {}", e)))?;
        url.query_pairs_mut().extend_pairs(params);

        Ok(url.to_string())
    }

    /// `sip:<canonical>@<account domain>`
    pub fn sip_uri(&self, phone: &NormalizedPhone) -> Result<String> {
        self.signing_secret()?;
        self.account_id()?;
        require_dialable(phone)?;

        let domain = match self.settings.sip_domain.as_deref() {
            Some(domain) => domain.to_string(),
            None => {
                let provider = self.settings.provider_domain.as_deref().ok_or_else(|| {
                    DomainError::ConfigurationMissing("sip_domain".to_string())
                })?;
                host_of(provider)?
            }
        };

        Ok(format!("sip:{}@{}", phone.canonical, domain))
    }

    fn signing_secret(&self) -> Result<&str> {
        let credentials = &self.settings.credentials;
        if !credentials.is_configured() {
            return Err(DomainError::ConfigurationMissing(
                credentials.missing().join(", "),
            ));
        }
        credentials
            .shared_secret()
            .ok_or_else(|| DomainError::ConfigurationMissing("shared_secret".to_string()))
    }

    fn account_id(&self) -> Result<&str> {
        self.settings
            .credentials
            .account_id()
            .ok_or_else(|| DomainError::ConfigurationMissing("account_id".to_string()))
    }
}

/// `tel:+<canonical>[,,<extension>]`; pauses before the extension digits.
pub fn tel_uri(canonical: &str, extension: Option<&str>) -> String {
    match extension.map(digits_only).filter(|ext| !ext.is_empty()) {
        Some(ext) => format!("tel:+{},,{}", canonical, ext),
        None => format!("tel:+{}", canonical),
    }
}

/// Only the `direct-tel` strategy could be built
pub fn is_fallback_only(strategies: &[DialStrategy]) -> bool {
    strategies.iter().all(|s| s.kind == StrategyKind::DirectTel)
}

pub(crate) fn digits_only(value: &str) -> String {
    value.chars().filter(|c| c.is_ascii_digit()).collect()
}

fn require_dialable(phone: &NormalizedPhone) -> Result<()> {
    if phone.is_dialable() {
        Ok(())
    } else {
        Err(DomainError::MalformedInput("no digits to dial".to_string()))
    }
}

fn base_url(domain: &str) -> Result<Url> {
    let raw = if domain.contains("://") {
        domain.to_string()
    } else {
        format!("https://{}", domain)
    };
    let raw = if raw.ends_with('/') { raw } else { format!("{}/", raw) };

    Url::parse(&raw)
        .map_err(|e| DomainError::ValidationError(format!("invalid provider domain {:?}: {}", domain, e)))
}

fn host_of(domain: &str) -> Result<String> {
    base_url(domain)?
        .host_str()
        .map(str::to_string)
        .ok_or_else(|| DomainError::ValidationError(format!("provider domain {:?} has no host", domain)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::auth_token::ManualClock;
    use chrono::{Duration, TimeZone, Utc};

    fn token() -> AuthToken {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        AuthToken {
            value: "tok123".to_string(),
            issued_at: now,
            expires_at: now + Duration::seconds(3300),
        }
    }

    fn configured() -> ResolverSettings {
        ResolverSettings {
            credentials: IntegrationCredentials::new(
                Some("key".to_string()),
                Some("secret".to_string()),
                Some("acct-42".to_string()),
            ),
            provider_domain: Some("dialer.example.com".to_string()),
            sip_domain: None,
            fallback_phone: Some(NormalizedPhone::parse("(800) 555-0100")),
        }
    }

    fn resolver(settings: ResolverSettings) -> StrategyResolver {
        let clock = ManualClock::new(Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap());
        StrategyResolver::new(settings).with_clock(Arc::new(clock))
    }

    fn target(phone: &NormalizedPhone) -> DialTarget<'_> {
        DialTarget {
            phone,
            contact_name: Some("Jane Doe"),
            extension: None,
        }
    }

    #[test]
    fn test_full_configuration_yields_three_ordered_strategies() {
        let phone = NormalizedPhone::parse("(877) 840-6250");
        let strategies = resolver(configured()).resolve(target(&phone), &token());

        let kinds: Vec<StrategyKind> = strategies.iter().map(|s| s.kind).collect();
        assert_eq!(
            kinds,
            vec![StrategyKind::WebDialer, StrategyKind::Sip, StrategyKind::DirectTel]
        );
        let priorities: Vec<u8> = strategies.iter().map(|s| s.priority).collect();
        assert_eq!(priorities, vec![1, 2, 3]);

        assert_eq!(strategies[1].uri, "sip:18778406250@dialer.example.com");
        assert_eq!(strategies[2].uri, "tel:+18778406250");
        assert!(!is_fallback_only(&strategies));
    }

    #[test]
    fn test_web_dialer_url_is_signed() {
        let phone = NormalizedPhone::parse("8778406250");
        let uri = resolver(configured())
            .web_dialer_uri(target(&phone), &token())
            .unwrap();
        let url = Url::parse(&uri).unwrap();

        assert_eq!(url.scheme(), "https");
        assert_eq!(url.host_str(), Some("dialer.example.com"));
        assert_eq!(url.path(), "/dial");

        let params: std::collections::HashMap<String, String> =
            url.query_pairs().into_owned().collect();
        let ts = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap().timestamp().to_string();

        assert_eq!(params["number"], "18778406250");
        assert_eq!(params["contact"], "Jane Doe");
        assert_eq!(params["account"], "acct-42");
        assert_eq!(params["from"], "18005550100");
        assert_eq!(params["ts"], ts);
        assert_eq!(params["auth"], "tok123");
        assert_eq!(
            params["sig"],
            sign("secret", &format!("acct-42:18778406250:{}", ts))
        );
    }

    #[test]
    fn test_no_credentials_reduces_to_tel() {
        let phone = NormalizedPhone::parse("9547939065");
        let strategies = resolver(ResolverSettings::default()).resolve(target(&phone), &token());

        assert_eq!(strategies.len(), 1);
        assert_eq!(strategies[0].kind, StrategyKind::DirectTel);
        assert_eq!(strategies[0].priority, 1);
        assert_eq!(strategies[0].uri, "tel:+19547939065");
        assert!(is_fallback_only(&strategies));
    }

    #[test]
    fn test_missing_secret_reduces_to_tel() {
        let mut settings = configured();
        settings.credentials =
            IntegrationCredentials::new(Some("key".to_string()), None, Some("acct-42".to_string()));

        let phone = NormalizedPhone::parse("9547939065");
        let strategies = resolver(settings).resolve(target(&phone), &token());

        assert_eq!(strategies.len(), 1);
        assert_eq!(strategies[0].kind, StrategyKind::DirectTel);
    }

    #[test]
    fn test_missing_provider_domain_keeps_explicit_sip_domain() {
        let mut settings = configured();
        settings.provider_domain = None;
        settings.sip_domain = Some("sip.acme.test".to_string());

        let phone = NormalizedPhone::parse("9547939065");
        let strategies = resolver(settings).resolve(target(&phone), &token());

        let kinds: Vec<StrategyKind> = strategies.iter().map(|s| s.kind).collect();
        assert_eq!(kinds, vec![StrategyKind::Sip, StrategyKind::DirectTel]);
        assert_eq!(strategies[0].uri, "sip:19547939065@sip.acme.test");
        assert_eq!(strategies[0].priority, 1);
    }

    #[test]
    fn test_provider_domain_with_scheme() {
        let mut settings = configured();
        settings.provider_domain = Some("http://localhost:9000/".to_string());

        let phone = NormalizedPhone::parse("9547939065");
        let resolver = resolver(settings);

        let uri = resolver.web_dialer_uri(target(&phone), &token()).unwrap();
        assert!(uri.starts_with("http://localhost:9000/dial?number=19547939065"));
        assert_eq!(resolver.sip_uri(&phone).unwrap(), "sip:19547939065@localhost");
    }

    #[test]
    fn test_undialable_number_only_gets_tel() {
        let phone = NormalizedPhone::parse("n/a");
        let strategies = resolver(configured()).resolve(target(&phone), &token());

        assert_eq!(strategies.len(), 1);
        assert_eq!(strategies[0].kind, StrategyKind::DirectTel);
    }

    #[test]
    fn test_tel_uri_with_extension() {
        assert_eq!(tel_uri("18778406250", Some("123")), "tel:+18778406250,,123");
        assert_eq!(tel_uri("18778406250", Some("x 45")), "tel:+18778406250,,45");
        assert_eq!(tel_uri("18778406250", Some("  ")), "tel:+18778406250");
        assert_eq!(tel_uri("18778406250", None), "tel:+18778406250");
    }

    #[test]
    fn test_strategy_kind_serialization() {
        assert_eq!(
            serde_json::to_string(&StrategyKind::DirectTel).unwrap(),
            "\"direct-tel\""
        );
        assert_eq!(
            serde_json::to_string(&StrategyKind::WebDialer).unwrap(),
            "\"web-dialer\""
        );
        assert_eq!(StrategyKind::Sip.to_string(), "sip");
    }
}
