//! Interface layer - External interfaces
//!
//! This layer handles:
//! - REST API endpoints
//! - Request/response formatting
//! - Prometheus metrics exposition

pub mod api;
