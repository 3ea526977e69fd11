//! Request and admission counters served at `/v1/metrics`

use parking_lot::RwLock;
use serde::Serialize;
use std::collections::BTreeMap;
use std::time::{Duration, Instant};

/// Counters behind a single lock
#[derive(Debug, Default)]
struct MetricsStorage {
    requests_received: u64,
    responses_sent: u64,
    processing_time_us: u64,
    responses_by_status: BTreeMap<u16, u64>,
    admission_denied: u64,
}

/// Collects process-wide request counters
#[derive(Debug)]
pub struct MetricsCollector {
    storage: RwLock<MetricsStorage>,
    start_time: Instant,
}

/// Point-in-time copy of the request counters
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RequestMetrics {
    pub total_requests_received: u64,
    pub total_responses_sent: u64,
    pub total_processing_time_us: u64,
    pub total_responses_sent_by_status: BTreeMap<u16, u64>,
    pub admission_denied: u64,
    pub uptime_secs: u64,
}

impl Default for MetricsCollector {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricsCollector {
    pub fn new() -> Self {
        Self {
            storage: RwLock::new(MetricsStorage::default()),
            start_time: Instant::now(),
        }
    }

    /// Count a request as it enters the service
    pub fn record_request(&self) {
        self.storage.write().requests_received += 1;
    }

    /// Count a response and the time spent producing it
    pub fn record_response(&self, status_code: u16, elapsed: Duration) {
        let mut storage = self.storage.write();
        storage.responses_sent += 1;
        storage.processing_time_us = storage
            .processing_time_us
            .saturating_add(elapsed.as_micros().min(u64::MAX as u128) as u64);
        *storage.responses_by_status.entry(status_code).or_insert(0) += 1;
    }

    /// Count a request turned away by either limiter
    pub fn record_denial(&self) {
        self.storage.write().admission_denied += 1;
    }

    pub fn snapshot(&self) -> RequestMetrics {
        let storage = self.storage.read();
        RequestMetrics {
            total_requests_received: storage.requests_received,
            total_responses_sent: storage.responses_sent,
            total_processing_time_us: storage.processing_time_us,
            total_responses_sent_by_status: storage.responses_by_status.clone(),
            admission_denied: storage.admission_denied,
            uptime_secs: self.start_time.elapsed().as_secs(),
        }
    }
}
