//! RingOut - outbound call preparation for telephony integrations
//!
//! Turns a raw phone number and contact into a ready-to-dial call
//! descriptor: the number is normalized, a rolling provider token is kept
//! fresh, and dial strategies (web dialer, SIP, `tel:`) are resolved in
//! priority order. Missing configuration or an unreachable provider lowers
//! the capability level; it never turns into an error for the caller.

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interface;

// Re-export commonly used types
pub use domain::shared::error::DomainError;
pub use domain::shared::result::Result;
