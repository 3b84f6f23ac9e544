//! Detached background work.
//!
//! Tasks outlive the request that started them. Each one runs inside
//! `catch_unwind`, so a panic is logged where it happens and the task still
//! counts as finished; the process never sees it. Shutdown closes the
//! tracker and waits for whatever is still running.

use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::time::Duration;

use futures::FutureExt;
use tokio_util::task::TaskTracker;
use tracing::{error, info, warn};

use crate::panic::panic_message;

/// Tracker for fire-and-forget tasks.
#[derive(Debug, Clone, Default)]
pub struct BackgroundTasks {
    tracker: TaskTracker,
}

impl BackgroundTasks {
    /// Creates an empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs `task` in the background under panic containment.
    pub fn spawn<F>(&self, name: &'static str, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.tracker.spawn(async move {
            if let Err(payload) = AssertUnwindSafe(task).catch_unwind().await {
                error!(
                    task = name,
                    panic = %panic_message(payload.as_ref()),
                    "Background task panicked"
                );
            }
        });
    }

    /// Number of tasks still running.
    pub fn in_flight(&self) -> usize {
        self.tracker.len()
    }

    /// Stops accepting new tasks and waits up to `timeout` for the rest.
    ///
    /// Returns `true` when every task finished in time.
    pub async fn shutdown(&self, timeout: Duration) -> bool {
        self.tracker.close();
        info!(in_flight = self.tracker.len(), "Waiting for background tasks");

        match tokio::time::timeout(timeout, self.tracker.wait()).await {
            Ok(()) => {
                info!("Background tasks completed");
                true
            }
            Err(_) => {
                warn!(
                    in_flight = self.tracker.len(),
                    "Background tasks did not finish before the shutdown deadline"
                );
                false
            }
        }
    }
}
