//! Detached work launched from request handlers

mod tracker;


pub(crate) use tracker::panic_message;
pub use tracker::BackgroundTaskTracker;
