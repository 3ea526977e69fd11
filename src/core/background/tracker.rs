//! Joinable tracker for fire-and-forget jobs

use futures::FutureExt;
use parking_lot::Mutex;
use std::fmt::Display;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::sync::Notify;
use tracing::{debug, error};

#[derive(Debug, Default)]
struct Inner {
    outstanding: Mutex<usize>,
    idle: Notify,
}

/// Decrements the outstanding count exactly once, on every exit path
struct JobGuard {
    inner: Arc<Inner>,
}

impl Drop for JobGuard {
    fn drop(&mut self) {
        let remaining = {
            let mut outstanding = self.inner.outstanding.lock();
            *outstanding -= 1;
            *outstanding
        };
        if remaining == 0 {
            self.inner.idle.notify_waiters();
        }
    }
}

/// Runs detached jobs on the runtime it was created on and lets shutdown
/// wait for all of them.
///
/// A job that fails or panics is logged and dropped; it never reaches the
/// request that launched it.
#[derive(Debug, Clone)]
pub struct BackgroundTaskTracker {
    inner: Arc<Inner>,
    handle: Handle,
}

impl BackgroundTaskTracker {
    /// Create a tracker bound to the current tokio runtime.
    ///
    /// # Panics
    ///
    /// Panics when called outside a tokio runtime.
    pub fn new() -> Self {
        Self::with_handle(Handle::current())
    }

    pub fn with_handle(handle: Handle) -> Self {
        Self {
            inner: Arc::new(Inner::default()),
            handle,
        }
    }

    /// Register `job` and start it without waiting for it.
    ///
    /// The job is counted before this returns, so a `wait` that starts
    /// afterwards always covers it.
    pub fn run<F, Fut, E>(&self, name: &'static str, job: F)
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<(), E>> + Send + 'static,
        E: Display + Send + 'static,
    {
        *self.inner.outstanding.lock() += 1;
        let guard = JobGuard {
            inner: Arc::clone(&self.inner),
        };

        self.handle.spawn(async move {
            let _guard = guard;

            match AssertUnwindSafe(async move { job().await })
                .catch_unwind()
                .await
            {
                Ok(Ok(())) => debug!(job = name, "Background job finished"),
                Ok(Err(e)) => error!(job = name, error = %e, "Background job failed"),
                Err(panic) => error!(
                    job = name,
                    panic = panic_message(panic.as_ref()),
                    "BackgroundJobFault: background job panicked"
                ),
            }
        });
    }

    /// Resolve once no job is outstanding
    pub async fn wait(&self) {
        loop {
            let notified = self.inner.idle.notified();
            if *self.inner.outstanding.lock() == 0 {
                return;
            }
            notified.await;
        }
    }

    /// Number of jobs registered but not yet finished
    pub fn outstanding(&self) -> usize {
        *self.inner.outstanding.lock()
    }
}

/// Best-effort text of a panic payload
pub(crate) fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
