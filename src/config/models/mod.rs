//! Configuration data models
//!
//! This module defines all configuration structures used throughout the API.

pub mod api;
pub mod mail;
pub mod rate_limit;
pub mod server;
pub mod storage;

pub use api::*;
pub use mail::*;
pub use rate_limit::*;
pub use server::*;
pub use storage::*;

/// Default values for configuration
pub fn default_host() -> String {
    "0.0.0.0".to_string()
}

/// Default server port
pub fn default_port() -> u16 {
    4000
}

/// Default deployment environment
pub fn default_environment() -> String {
    "development".to_string()
}

/// Default drain deadline for in-flight HTTP connections, in seconds
pub fn default_shutdown_timeout() -> u64 {
    5
}

/// Default maximum JSON body size in bytes
pub fn default_max_body_size() -> usize {
    1_048_576
}

pub fn default_rps() -> f64 {
    2.0
}

pub fn default_burst() -> u32 {
    4
}

/// Idle window after which a client entry is evicted, in seconds
pub fn default_idle_timeout() -> u64 {
    180
}

/// Interval between sweeper passes, in seconds
pub fn default_sweep_interval() -> u64 {
    60
}

/// Deadline for a single store call, in seconds
pub fn default_query_timeout() -> u64 {
    3
}

pub fn default_true() -> bool {
    true
}
