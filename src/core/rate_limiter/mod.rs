//! Admission control
//!
//! A [`GlobalLimiter`] caps aggregate throughput; a [`ClientRegistry`] keeps
//! one token bucket per client key and evicts idle keys in the background.

mod bucket;
mod global;
mod registry;
mod sweeper;
mod types;


pub use bucket::TokenBucket;
pub use global::GlobalLimiter;
pub use registry::ClientRegistry;
pub use types::Admission;
