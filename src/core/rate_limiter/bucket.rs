//! Token bucket

use tokio::time::Instant;

/// Capped pool of tokens refilled lazily from elapsed time.
///
/// `0 <= tokens <= capacity` holds after every call.
#[derive(Debug, Clone)]
pub struct TokenBucket {
    capacity: u32,
    refill_rate: f64,
    tokens: f64,
    last_refill: Instant,
}

impl TokenBucket {
    /// Create a full bucket
    pub fn new(refill_rate: f64, capacity: u32) -> Self {
        Self::new_at(refill_rate, capacity, Instant::now())
    }

    pub fn new_at(refill_rate: f64, capacity: u32, now: Instant) -> Self {
        Self {
            capacity,
            refill_rate,
            tokens: capacity as f64,
            last_refill: now,
        }
    }

    /// Refill for the time elapsed up to `now`, then try to take one token.
    ///
    /// The refill is applied even when no token is available.
    pub fn try_acquire_at(&mut self, now: Instant) -> bool {
        self.refill(now);

        if self.tokens >= 1.0 {
            self.tokens -= 1.0;
            true
        } else {
            false
        }
    }

    fn refill(&mut self, now: Instant) {
        // Clock readings taken before the last refill add nothing
        let elapsed = now.saturating_duration_since(self.last_refill);
        let added = elapsed.as_secs_f64() * self.refill_rate;
        self.tokens = (self.tokens + added).min(self.capacity as f64);
        if now > self.last_refill {
            self.last_refill = now;
        }
    }

    pub fn tokens(&self) -> f64 {
        self.tokens
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    pub fn refill_rate(&self) -> f64 {
        self.refill_rate
    }
}
