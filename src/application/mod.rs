//! Application layer - Use cases and application services
//!
//! This layer orchestrates domain services to fulfill use cases.
//! It's responsible for:
//! - Running the call preparation flow end to end
//! - Turning degraded capability into human-readable messages

pub mod call_preparation;

pub use call_preparation::{CallPreparationService, PreparedCall};
