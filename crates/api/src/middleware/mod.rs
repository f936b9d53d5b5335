//! HTTP middleware components.

pub mod auth;
pub mod error_detail;
pub mod logging;
pub mod metrics;
pub mod rate_limit;
pub mod request_id;

pub use auth::require_auth;
pub use error_detail::expose_error_detail;
pub use metrics::{init_metrics, metrics_handler, metrics_middleware};
pub use rate_limit::{rate_limit_middleware, RateLimiterState};
pub use request_id::{request_id, RequestId, REQUEST_ID_HEADER};
