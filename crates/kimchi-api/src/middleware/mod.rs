//! API 서버용 HTTP middleware.

mod metrics;
mod timeout;

pub use metrics::metrics_layer;
pub use timeout::timeout_layer;
