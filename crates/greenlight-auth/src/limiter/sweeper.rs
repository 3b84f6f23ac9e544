//! Background sweep loop with an explicit start/stop lifecycle.

use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use super::rate_limiter::RateLimiter;

/// Handle to a running sweep task.
///
/// [`stop`](SweeperHandle::stop) signals the loop and waits for it to
/// exit. Dropping the handle signals the loop without waiting.
#[derive(Debug)]
pub struct SweeperHandle {
    cancel: watch::Sender<bool>,
    task: Option<JoinHandle<()>>,
}

impl SweeperHandle {
    /// Signals the loop to exit and waits for it.
    pub async fn stop(mut self) {
        self.cancel.send_replace(true);
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                warn!(error = %e, "Rate limiter sweeper ended abnormally");
            }
        }
    }
}

impl Drop for SweeperHandle {
    fn drop(&mut self) {
        self.cancel.send_replace(true);
    }
}

pub(crate) fn spawn(limiter: RateLimiter, period: Duration) -> SweeperHandle {
    let (cancel, receiver) = watch::channel(false);
    let task = tokio::spawn(run(limiter, period, receiver));
    SweeperHandle {
        cancel,
        task: Some(task),
    }
}

async fn run(limiter: RateLimiter, period: Duration, mut cancel: watch::Receiver<bool>) {
    info!(
        interval_seconds = period.as_secs(),
        "Rate limiter sweeper started"
    );

    let mut interval = time::interval_at(Instant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = interval.tick() => {
                let removed = limiter.sweep().await;
                if removed > 0 {
                    debug!(removed, "Evicted idle rate limiter clients");
                }
            }
            changed = cancel.changed() => {
                if changed.is_err() || *cancel.borrow() {
                    break;
                }
            }
        }
    }

    info!("Rate limiter sweeper stopped");
}
