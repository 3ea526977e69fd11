//! Signal-driven, single-fire server teardown

mod coordinator;
mod signal;

#[cfg(test)]
mod tests;

pub use coordinator::{ShutdownCoordinator, ShutdownState};
