//! Admission control types

use super::bucket::TokenBucket;
use tokio::time::Instant;

/// Outcome of an admission check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    Allowed,
    Denied,
}

impl Admission {
    pub fn is_allowed(self) -> bool {
        self == Admission::Allowed
    }
}

/// Per-client limiter state, owned by the registry
#[derive(Debug, Clone)]
pub(super) struct ClientEntry {
    pub(super) bucket: TokenBucket,
    pub(super) last_seen: Instant,
}

impl ClientEntry {
    pub(super) fn new(rate: f64, burst: u32, now: Instant) -> Self {
        Self {
            bucket: TokenBucket::new_at(rate, burst, now),
            last_seen: now,
        }
    }
}
