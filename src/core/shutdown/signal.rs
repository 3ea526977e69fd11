//! Termination signal listener

use super::coordinator::ShutdownCoordinator;
use tokio::task::JoinHandle;
use tracing::warn;

/// Install SIGINT and SIGTERM handlers, then forward every signal to the
/// coordinator until the returned task is aborted.
///
/// Handlers are in place when this returns. `None` if they could not be
/// installed.
#[cfg(unix)]
pub(super) fn spawn_listener(coordinator: ShutdownCoordinator) -> Option<JoinHandle<()>> {
    use tokio::signal::unix::{SignalKind, signal};

    let (mut interrupt, mut terminate) =
        match (signal(SignalKind::interrupt()), signal(SignalKind::terminate())) {
            (Ok(interrupt), Ok(terminate)) => (interrupt, terminate),
            (Err(e), _) | (_, Err(e)) => {
                warn!("Failed to install signal handlers: {}", e);
                return None;
            }
        };

    Some(tokio::spawn(async move {
        loop {
            let name = tokio::select! {
                Some(()) = interrupt.recv() => "SIGINT",
                Some(()) = terminate.recv() => "SIGTERM",
                else => return,
            };
            coordinator.on_signal(name);
        }
    }))
}

/// Forward Ctrl+C to the coordinator until the returned task is aborted
#[cfg(not(unix))]
pub(super) fn spawn_listener(coordinator: ShutdownCoordinator) -> Option<JoinHandle<()>> {
    Some(tokio::spawn(async move {
        loop {
            match tokio::signal::ctrl_c().await {
                Ok(()) => coordinator.on_signal("Ctrl+C"),
                Err(e) => {
                    warn!("Failed to install Ctrl+C handler: {}", e);
                    return;
                }
            }
        }
    }))
}
