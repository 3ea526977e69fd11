//! Single shared bucket gating aggregate throughput

use super::bucket::TokenBucket;
use super::types::Admission;
use crate::config::GlobalRateLimitConfig;
use parking_lot::Mutex;
use tokio::time::Instant;

/// Keyless limiter checked before the per-client registry
#[derive(Debug)]
pub struct GlobalLimiter {
    enabled: bool,
    bucket: Mutex<TokenBucket>,
}

impl GlobalLimiter {
    pub fn new(config: &GlobalRateLimitConfig) -> Self {
        Self {
            enabled: config.enabled,
            bucket: Mutex::new(TokenBucket::new(config.rps, config.burst)),
        }
    }

    pub fn admit(&self) -> Admission {
        self.admit_at(Instant::now())
    }

    pub fn admit_at(&self, now: Instant) -> Admission {
        if !self.enabled {
            return Admission::Allowed;
        }

        if self.bucket.lock().try_acquire_at(now) {
            Admission::Allowed
        } else {
            Admission::Denied
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
}
