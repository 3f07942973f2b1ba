//! Rolling provider auth token
//!
//! The token is a keyed hash of the API key and a coarse timestamp, so every
//! derivation inside the same time window produces the same value. That is
//! what lets concurrent requests refresh the cache without coordinating.

use chrono::{DateTime, Duration, Utc};
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use std::sync::{Arc, RwLock};
use tracing::{debug, warn};

/// Nominal token lifetime (seconds)
pub const DEFAULT_TOKEN_LIFETIME_SECS: i64 = 3600;

/// Refresh this long before the nominal lifetime elapses (seconds)
pub const DEFAULT_SAFETY_MARGIN_SECS: i64 = 300;

/// Upper bound for a configured lifetime (30 days)
pub const MAX_TOKEN_LIFETIME_SECS: i64 = 30 * 24 * 3600;

type HmacSha256 = Hmac<Sha256>;

/// Hex-encoded HMAC-SHA256 of `message` keyed with `key`.
pub fn sign(key: &str, message: &str) -> String {
    let mut mac = HmacSha256::new_from_slice(key.as_bytes()).expect("HMAC accepts any key length");
    mac.update(message.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

/// Source of the current time
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Signed provider token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthToken {
    pub value: String,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl AuthToken {
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }

    /// Seconds left before expiry, negative once expired
    pub fn expires_in(&self, now: DateTime<Utc>) -> i64 {
        (self.expires_at - now).num_seconds()
    }
}

/// Derives and caches the provider auth token.
pub struct TokenManager {
    api_key: String,
    shared_secret: String,
    lifetime: Duration,
    safety_margin: Duration,
    clock: Arc<dyn Clock>,
    cached: RwLock<Option<AuthToken>>,
}

impl TokenManager {
    /// Missing credentials are accepted; the token is then computed from
    /// empty strings and the Status Reporter reports the gap.
    pub fn new(api_key: Option<&str>, shared_secret: Option<&str>) -> Self {
        Self {
            api_key: api_key.unwrap_or_default().to_string(),
            shared_secret: shared_secret.unwrap_or_default().to_string(),
            lifetime: Duration::seconds(DEFAULT_TOKEN_LIFETIME_SECS),
            safety_margin: Duration::seconds(DEFAULT_SAFETY_MARGIN_SECS),
            clock: Arc::new(SystemClock),
            cached: RwLock::new(None),
        }
    }

    /// Lifetime is clamped to `1..=MAX_TOKEN_LIFETIME_SECS`, the margin to
    /// `0..=lifetime`.
    pub fn with_lifetime(mut self, lifetime_secs: i64, safety_margin_secs: i64) -> Self {
        let lifetime_secs = lifetime_secs.clamp(1, MAX_TOKEN_LIFETIME_SECS);
        let safety_margin_secs = safety_margin_secs.clamp(0, lifetime_secs);
        debug!(
            "Token lifetime {}s with {}s safety margin",
            lifetime_secs, safety_margin_secs
        );

        self.lifetime = Duration::seconds(lifetime_secs);
        self.safety_margin = Duration::seconds(safety_margin_secs);
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Lifetime minus safety margin, never below one second
    pub fn effective_lifetime(&self) -> Duration {
        let effective = self.lifetime - self.safety_margin;
        if effective < Duration::seconds(1) {
            Duration::seconds(1)
        } else {
            effective
        }
    }

    pub fn has_secret(&self) -> bool {
        !self.shared_secret.is_empty()
    }

    /// Return the cached token, deriving a fresh one when it has expired.
    pub fn ensure_valid_token(&self) -> AuthToken {
        let now = self.clock.now();

        if let Some(token) = self.cached_token() {
            if token.is_valid_at(now) {
                return token;
            }
            debug!("Auth token expired at {}, refreshing", token.expires_at);
        }

        let token = self.derive(now);
        match self.cached.write() {
            Ok(mut cached) => *cached = Some(token.clone()),
            Err(poisoned) => *poisoned.into_inner() = Some(token.clone()),
        }

        token
    }

    /// Drop the cached token so the next call derives a new one
    pub fn invalidate(&self) {
        match self.cached.write() {
            Ok(mut cached) => *cached = None,
            Err(poisoned) => *poisoned.into_inner() = None,
        }
    }

    fn cached_token(&self) -> Option<AuthToken> {
        match self.cached.read() {
            Ok(cached) => cached.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    fn derive(&self, now: DateTime<Utc>) -> AuthToken {
        if !self.has_secret() {
            warn!("Shared secret not configured, deriving unsigned auth token");
        }

        let lifetime = self.effective_lifetime();
        let window = now.timestamp().div_euclid(lifetime.num_seconds());
        let value = sign(&self.shared_secret, &format!("{}:{}", self.api_key, window));

        debug!("Derived auth token for window {}", window);

        AuthToken {
            value,
            issued_at: now,
            expires_at: now.checked_add_signed(lifetime).unwrap_or(DateTime::<Utc>::MAX_UTC),
        }
    }
}

/// Clock that only moves when told to
#[cfg(test)]
pub(crate) struct ManualClock {
    now: std::sync::Mutex<DateTime<Utc>>,
}

#[cfg(test)]
impl ManualClock {
    pub(crate) fn new(now: DateTime<Utc>) -> Self {
        Self {
            now: std::sync::Mutex::new(now),
        }
    }

    pub(crate) fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap();
        *now = *now + by;
    }
}

#[cfg(test)]
impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }
}
