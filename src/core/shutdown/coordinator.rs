//! Shutdown state machine

use super::signal;
use crate::core::background::BackgroundTaskTracker;
use actix_web::dev::Server;
use std::fmt;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{info, warn};

/// Lifecycle of the process; only ever moves forward
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ShutdownState {
    Running,
    Draining,
    Stopped,
}

impl fmt::Display for ShutdownState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShutdownState::Running => write!(f, "running"),
            ShutdownState::Draining => write!(f, "draining"),
            ShutdownState::Stopped => write!(f, "stopped"),
        }
    }
}

/// Owns the [`ShutdownState`] and sequences teardown.
///
/// The first termination signal (or [`begin_drain`] call) stops the HTTP
/// server from accepting, lets in-flight requests finish within the
/// server's shutdown timeout, then waits for every background job before
/// reporting [`ShutdownState::Stopped`].
///
/// [`begin_drain`]: ShutdownCoordinator::begin_drain
#[derive(Debug, Clone)]
pub struct ShutdownCoordinator {
    state: Arc<watch::Sender<ShutdownState>>,
}

impl Default for ShutdownCoordinator {
    fn default() -> Self {
        Self::new()
    }
}

impl ShutdownCoordinator {
    pub fn new() -> Self {
        let (state, _) = watch::channel(ShutdownState::Running);
        Self {
            state: Arc::new(state),
        }
    }

    pub fn state(&self) -> ShutdownState {
        *self.state.borrow()
    }

    pub fn is_draining(&self) -> bool {
        self.state() != ShutdownState::Running
    }

    /// Observe state transitions
    pub fn subscribe(&self) -> watch::Receiver<ShutdownState> {
        self.state.subscribe()
    }

    /// Move `Running` to `Draining`. Returns `false` if shutdown had
    /// already begun.
    pub fn begin_drain(&self, reason: &str) -> bool {
        let fired = self.advance(ShutdownState::Draining);
        if fired {
            info!(reason, "Shutdown started, draining");
        }
        fired
    }

    /// Move to `Stopped`. Returns `false` if already stopped.
    pub fn mark_stopped(&self) -> bool {
        self.advance(ShutdownState::Stopped)
    }

    fn advance(&self, next: ShutdownState) -> bool {
        self.state.send_if_modified(|state| {
            if *state < next {
                *state = next;
                true
            } else {
                false
            }
        })
    }

    /// React to a termination signal
    pub(super) fn on_signal(&self, signal: &'static str) {
        if !self.begin_drain(signal) {
            warn!(signal, state = %self.state(), "Shutdown already in progress, ignoring signal");
        }
    }

    /// Serve until shutdown, then drain background work.
    ///
    /// Resolves once the state is `Stopped`; releasing resources such as the
    /// store is left to the caller.
    pub async fn run(&self, server: Server, tracker: &BackgroundTaskTracker) -> std::io::Result<()> {
        let signals = signal::spawn_listener(self.clone());

        let stopper = {
            let handle = server.handle();
            let mut state = self.subscribe();
            tokio::spawn(async move {
                if state
                    .wait_for(|s| *s != ShutdownState::Running)
                    .await
                    .is_ok()
                {
                    info!("Stopping HTTP server, no longer accepting connections");
                    handle.stop(true).await;
                }
            })
        };

        let served = server.await;
        self.begin_drain("HTTP server exited");
        stopper.abort();

        info!(
            outstanding = tracker.outstanding(),
            "HTTP server stopped, waiting for background jobs"
        );
        tracker.wait().await;

        self.mark_stopped();
        if let Some(signals) = signals {
            signals.abort();
        }
        info!("Shutdown complete");

        served
    }
}
