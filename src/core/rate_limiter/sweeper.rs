//! Background eviction of idle clients

use super::registry::ClientRegistry;
use crate::core::shutdown::ShutdownState;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

impl ClientRegistry {
    /// Run [`sweep`](ClientRegistry::sweep) every `interval` until the
    /// shutdown state leaves `Running` or its sender is dropped.
    pub fn spawn_sweeper(
        self: &Arc<Self>,
        interval: Duration,
        mut shutdown: watch::Receiver<ShutdownState>,
    ) -> JoinHandle<()> {
        let registry = Arc::clone(self);

        tokio::spawn(async move {
            info!(
                interval_secs = interval.as_secs(),
                idle_timeout_secs = registry.idle_timeout().as_secs(),
                "Client registry sweeper started"
            );

            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first tick completes immediately
            ticker.tick().await;

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        let evicted = registry.sweep();
                        if evicted > 0 {
                            debug!(evicted, remaining = registry.len(), "Evicted idle clients");
                        }
                    }
                    _ = shutdown.wait_for(|state| *state != ShutdownState::Running) => break,
                }
            }

            info!("Client registry sweeper stopped");
        })
    }
}
