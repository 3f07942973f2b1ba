//! Infrastructure layer - Technical implementations
//!
//! This layer contains:
//! - Call log store implementations
//! - The HTTP client that probes the telephony provider

pub mod persistence;
pub mod provider;
