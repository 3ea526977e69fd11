//! HTTP middleware
//!
//! Registered on the app, outermost first:
//! - request counting ([`MetricsMiddleware`])
//! - request id tagging
//! - panic isolation ([`RecoverPanic`])
//! - admission control ([`RateLimit`])
//! - CORS (`actix-cors`)
//! - authentication ([`Authenticate`])
//!
//! [`Authorize`] wraps individual routes.

mod auth;
mod helpers;
mod metrics;
mod rate_limit;
mod recover;
mod request_id;

#[cfg(test)]
mod tests;

pub use auth::{Authenticate, AuthenticateService, Authorize, AuthorizeService};
pub use helpers::{client_key, current_request_id, log_internal_error};
pub use metrics::{MetricsMiddleware, MetricsMiddlewareService};
pub use rate_limit::{RateLimit, RateLimitService};
pub use recover::{RecoverPanic, RecoverPanicService};
pub use request_id::{RequestId, RequestIdMiddleware, RequestIdMiddlewareService};
