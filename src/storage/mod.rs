//! Storage layer for the API
//!
//! Persistence sits behind the collaborator traits in [`traits`]; every call
//! made on the request path goes through [`StorageLayer::bounded`] so that a
//! slow backend fails as [`StoreError::Timeout`] instead of holding the
//! request open.

mod error;
pub mod memory;
pub mod models;
pub mod traits;

pub use error::StoreError;
pub use memory::MemoryStore;
pub use models::*;
pub use traits::*;

use crate::config::StorageConfig;
use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tracing::{debug, info};

/// Handles to every store plus the per-call deadline
#[derive(Clone)]
pub struct StorageLayer {
    users: Arc<dyn UserStore>,
    tokens: Arc<dyn TokenStore>,
    permissions: Arc<dyn PermissionStore>,
    movies: Arc<dyn MovieStore>,
    query_timeout: Duration,
    closed: Arc<AtomicBool>,
}

impl std::fmt::Debug for StorageLayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorageLayer")
            .field("query_timeout", &self.query_timeout)
            .field("closed", &self.is_closed())
            .finish()
    }
}

impl StorageLayer {
    /// Create a storage layer backed by a single in-memory store
    pub fn in_memory(config: &StorageConfig) -> Self {
        info!("Initializing in-memory storage layer");
        let store = Arc::new(MemoryStore::new());
        Self::new(
            store.clone(),
            store.clone(),
            store.clone(),
            store,
            config.query_timeout(),
        )
    }

    /// Create a storage layer from individual collaborators
    pub fn new(
        users: Arc<dyn UserStore>,
        tokens: Arc<dyn TokenStore>,
        permissions: Arc<dyn PermissionStore>,
        movies: Arc<dyn MovieStore>,
        query_timeout: Duration,
    ) -> Self {
        Self {
            users,
            tokens,
            permissions,
            movies,
            query_timeout,
            closed: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn users(&self) -> &dyn UserStore {
        self.users.as_ref()
    }

    pub fn tokens(&self) -> &dyn TokenStore {
        self.tokens.as_ref()
    }

    pub fn permissions(&self) -> &dyn PermissionStore {
        self.permissions.as_ref()
    }

    pub fn movies(&self) -> &dyn MovieStore {
        self.movies.as_ref()
    }

    pub fn query_timeout(&self) -> Duration {
        self.query_timeout
    }

    /// Run a store call under the query deadline
    pub async fn bounded<T, F>(&self, call: F) -> Result<T, StoreError>
    where
        F: Future<Output = Result<T, StoreError>>,
    {
        if self.is_closed() {
            return Err(StoreError::Closed);
        }

        match tokio::time::timeout(self.query_timeout, call).await {
            Ok(result) => result,
            Err(_) => Err(StoreError::Timeout),
        }
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    /// Release the store; later calls fail with [`StoreError::Closed`]
    pub fn close(&self) {
        if !self.closed.swap(true, Ordering::AcqRel) {
            info!("Storage layer closed");
        } else {
            debug!("Storage layer already closed");
        }
    }
}
