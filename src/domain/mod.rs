//! Domain layer - Core business logic and rules
//!
//! This layer contains:
//! - Value Objects: phone numbers, call ids, credentials
//! - Domain Services: token derivation, strategy resolution, status reporting
//! - Ports: the health probe and the call log store

pub mod auth_token;
pub mod call;
pub mod call_log;
pub mod dial_strategy;
pub mod integration_status;
pub mod phone;
pub mod shared;

// Re-export commonly used types
pub use shared::{DomainError, Result};
