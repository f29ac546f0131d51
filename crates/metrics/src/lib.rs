pub mod service;
pub mod tracing;

pub use service::MetricsService;
pub use tracing::TracingService;
