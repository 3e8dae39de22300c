//! Scheduler (spec.md §4.5): a single periodic driver invoking the dispatch
//! service's sweep at a configurable interval.

use crate::dispatch::DispatchService;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;
use tokio::task::JoinHandle;

/// Owns the background task that drives `periodic_dispatch()`. `start()` is
/// idempotent while running; `stop()` grants the in-flight cycle up to 5s
/// before forcing termination (spec.md §4.5).
pub struct Scheduler {
    dispatch: Arc<DispatchService>,
    interval: Duration,
    running: AtomicBool,
    shutdown: Arc<Notify>,
    handle: parking_lot::Mutex<Option<JoinHandle<()>>>,
}

const STOP_GRACE_PERIOD: Duration = Duration::from_secs(5);

impl Scheduler {
    pub fn new(dispatch: Arc<DispatchService>, interval: Duration) -> Self {
        Self {
            dispatch,
            interval,
            running: AtomicBool::new(false),
            shutdown: Arc::new(Notify::new()),
            handle: parking_lot::Mutex::new(None),
        }
    }

    /// Transitions stopped -> running. A no-op with a warning if already
    /// running (spec.md §4.5).
    pub fn start(&self) {
        if self.running.swap(true, Ordering::SeqCst) {
            tracing::warn!("scheduler start() called while already running; ignoring");
            return;
        }

        let dispatch = self.dispatch.clone();
        let interval = self.interval;
        let shutdown = self.shutdown.clone();

        let handle = tokio::spawn(async move {
            // Initial delay equal to one interval (spec.md §4.5).
            tokio::select! {
                _ = tokio::time::sleep(interval) => {}
                _ = shutdown.notified() => return,
            }

            loop {
                let cycle = async {
                    let assigned = dispatch.periodic_dispatch().await;
                    tracing::info!(assigned, "periodic dispatch cycle completed");
                };

                tokio::select! {
                    _ = cycle => {}
                    _ = shutdown.notified() => return,
                }

                tokio::select! {
                    _ = tokio::time::sleep(interval) => {}
                    _ = shutdown.notified() => return,
                }
            }
        });

        *self.handle.lock() = Some(handle);
        tracing::info!(interval_seconds = interval.as_secs(), "scheduler started");
    }

    /// Transitions running -> stopped, waiting up to 5s for the current
    /// cycle before forcing termination.
    pub async fn stop(&self) {
        if !self.running.swap(false, Ordering::SeqCst) {
            return;
        }

        self.shutdown.notify_waiters();
        let handle = self.handle.lock().take();
        if let Some(handle) = handle {
            if tokio::time::timeout(STOP_GRACE_PERIOD, handle).await.is_err() {
                tracing::warn!("scheduler cycle did not finish within grace period; forced stop");
            }
        }
        tracing::info!("scheduler stopped");
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }
}
