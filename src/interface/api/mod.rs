//! API interface implementations

pub mod calls_handler;
pub mod dto;
pub mod metrics_handler;
pub mod router;
pub mod status_handler;

pub use dto::{ApiResponse, PrepareCallResponse};
pub use metrics_handler::init_metrics;
pub use router::{build_router, AppState};
