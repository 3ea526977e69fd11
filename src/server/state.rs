//! Application state shared across HTTP handlers

use crate::auth::Authenticator;
use crate::config::Config;
use crate::core::{
    BackgroundTaskTracker, ClientRegistry, GlobalLimiter, MetricsCollector, ShutdownCoordinator,
};
use crate::services::{LogMailer, Mailer};
use crate::storage::StorageLayer;
use std::sync::Arc;

/// Shared resources handed to every worker.
///
/// Cloning is cheap; every field is reference counted.
#[derive(Clone)]
pub struct AppState {
    /// Validated configuration (read-only)
    pub config: Arc<Config>,
    /// Store collaborators behind the query deadline
    pub storage: StorageLayer,
    /// Bearer credential resolution
    pub authenticator: Authenticator,
    /// Per-client admission buckets
    pub clients: Arc<ClientRegistry>,
    /// Aggregate admission bucket
    pub global_limiter: Arc<GlobalLimiter>,
    /// Fire-and-forget work that shutdown waits for
    pub tracker: BackgroundTaskTracker,
    /// Outgoing mail
    pub mailer: Arc<dyn Mailer>,
    /// Process lifecycle
    pub shutdown: ShutdownCoordinator,
    /// Request and admission counters
    pub metrics: Arc<MetricsCollector>,
}

impl AppState {
    /// Build state backed by the in-memory store and the logging mailer.
    ///
    /// Must be called inside a Tokio runtime; background jobs are spawned
    /// on it.
    pub fn new(config: Config) -> Self {
        let storage = StorageLayer::in_memory(config.storage());
        let mailer: Arc<dyn Mailer> = Arc::new(LogMailer::new(config.mail()));
        Self::with_parts(config, storage, mailer)
    }

    /// Build state around existing collaborators
    pub fn with_parts(config: Config, storage: StorageLayer, mailer: Arc<dyn Mailer>) -> Self {
        Self {
            authenticator: Authenticator::new(storage.clone()),
            clients: Arc::new(ClientRegistry::new(config.limiter())),
            global_limiter: Arc::new(GlobalLimiter::new(&config.limiter().global)),
            tracker: BackgroundTaskTracker::new(),
            shutdown: ShutdownCoordinator::new(),
            metrics: Arc::new(MetricsCollector::new()),
            config: Arc::new(config),
            storage,
            mailer,
        }
    }
}
