//! Per-client admission registry

use super::types::{Admission, ClientEntry};
use crate::config::RateLimitConfig;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::time::Duration;
use tokio::time::Instant;

/// Map of client key to token bucket, shared by every request.
///
/// Every access goes through one mutex held for a single map operation.
/// Entries idle for longer than the idle timeout are removed by [`sweep`],
/// normally driven by [`spawn_sweeper`].
///
/// [`sweep`]: ClientRegistry::sweep
/// [`spawn_sweeper`]: ClientRegistry::spawn_sweeper
#[derive(Debug)]
pub struct ClientRegistry {
    enabled: bool,
    rate: f64,
    burst: u32,
    idle_timeout: Duration,
    pub(super) clients: Mutex<HashMap<String, ClientEntry>>,
}

impl ClientRegistry {
    pub fn new(config: &RateLimitConfig) -> Self {
        Self {
            enabled: config.enabled,
            rate: config.rps,
            burst: config.burst,
            idle_timeout: config.idle_timeout(),
            clients: Mutex::new(HashMap::new()),
        }
    }

    /// Admit or deny one request from `key`
    pub fn admit(&self, key: &str) -> Admission {
        self.admit_at(key, Instant::now())
    }

    /// Admit or deny one request from `key` as of `now`
    pub fn admit_at(&self, key: &str, now: Instant) -> Admission {
        if !self.enabled {
            return Admission::Allowed;
        }

        let mut clients = self.clients.lock();
        let entry = if let Some(entry) = clients.get_mut(key) {
            entry
        } else {
            clients
                .entry(key.to_string())
                .or_insert_with(|| ClientEntry::new(self.rate, self.burst, now))
        };

        if now > entry.last_seen {
            entry.last_seen = now;
        }

        if entry.bucket.try_acquire_at(now) {
            Admission::Allowed
        } else {
            Admission::Denied
        }
    }

    /// Evict idle entries, returning how many were removed
    pub fn sweep(&self) -> usize {
        self.sweep_at(Instant::now())
    }

    pub fn sweep_at(&self, now: Instant) -> usize {
        let mut clients = self.clients.lock();
        let before = clients.len();
        clients.retain(|_, entry| now.saturating_duration_since(entry.last_seen) <= self.idle_timeout);
        before - clients.len()
    }

    /// Number of tracked clients
    pub fn len(&self) -> usize {
        self.clients.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn idle_timeout(&self) -> Duration {
        self.idle_timeout
    }
}
