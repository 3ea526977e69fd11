//! Admission control configuration

use super::*;
use serde::{Deserialize, Serialize};

/// Per-client rate limiting configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RateLimitConfig {
    /// Enable per-client admission control
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Sustained requests per second per client
    #[serde(default = "default_rps")]
    pub rps: f64,
    /// Bucket capacity per client
    #[serde(default = "default_burst")]
    pub burst: u32,
    /// Seconds a client may stay idle before its entry is evicted
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_secs: u64,
    /// Seconds between sweeper passes
    #[serde(default = "default_sweep_interval")]
    pub sweep_interval_secs: u64,
    /// Aggregate limiter in front of the per-client one
    #[serde(default)]
    pub global: GlobalRateLimitConfig,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            rps: default_rps(),
            burst: default_burst(),
            idle_timeout_secs: default_idle_timeout(),
            sweep_interval_secs: default_sweep_interval(),
            global: GlobalRateLimitConfig::default(),
        }
    }
}

impl RateLimitConfig {
    pub fn idle_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.idle_timeout_secs)
    }

    pub fn sweep_interval(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.sweep_interval_secs)
    }

    /// Validate rate limit configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.enabled {
            validate_bucket(self.rps, self.burst)?;

            if self.idle_timeout_secs == 0 {
                return Err("Idle timeout cannot be 0".to_string());
            }

            if self.sweep_interval_secs == 0 {
                return Err("Sweep interval cannot be 0".to_string());
            }
        }

        if self.global.enabled {
            validate_bucket(self.global.rps, self.global.burst)
                .map_err(|e| format!("global limiter: {}", e))?;
        }

        Ok(())
    }
}

/// Single shared bucket gating total throughput
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GlobalRateLimitConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_rps")]
    pub rps: f64,
    #[serde(default = "default_burst")]
    pub burst: u32,
}

impl Default for GlobalRateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            rps: default_rps(),
            burst: default_burst(),
        }
    }
}

fn validate_bucket(rps: f64, burst: u32) -> Result<(), String> {
    if !rps.is_finite() || rps <= 0.0 {
        return Err(format!("rps must be a positive number, got {}", rps));
    }

    if burst == 0 {
        return Err("burst cannot be 0".to_string());
    }

    Ok(())
}
