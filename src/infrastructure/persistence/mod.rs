//! Persistence implementations

pub mod call_log_repository;

pub use call_log_repository::InMemoryCallLog;
