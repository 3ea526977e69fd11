//! Request-lifecycle concurrency core
//!
//! Admission control, background work tracking, request counters and
//! shutdown sequencing.
//! Authorization lives in [`crate::auth`].

pub mod background;
pub mod metrics;
pub mod rate_limiter;
pub mod shutdown;

pub use background::BackgroundTaskTracker;
pub use metrics::MetricsCollector;
pub use rate_limiter::{Admission, ClientRegistry, GlobalLimiter};
pub use shutdown::{ShutdownCoordinator, ShutdownState};
