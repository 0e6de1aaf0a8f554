//! Run-in-flight bookkeeping for graceful shutdown.
//!
//! Advisory only: the tracker tells a host process whether a pass is in
//! flight so shutdown can drain before terminating. It is not a concurrency
//! primitive and does not mutually exclude overlapping passes.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Notify;

struct TrackerInner {
    active: AtomicUsize,
    idle: Notify,
}

/// Counts in-flight reconciliation passes.
#[derive(Clone)]
pub struct RunTracker {
    inner: Arc<TrackerInner>,
}

impl Default for RunTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl RunTracker {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(TrackerInner {
                active: AtomicUsize::new(0),
                idle: Notify::new(),
            }),
        }
    }

    /// Mark a pass as started; the pass is in flight until the guard drops.
    pub fn track(&self) -> RunGuard {
        self.inner.active.fetch_add(1, Ordering::SeqCst);
        RunGuard {
            inner: Arc::clone(&self.inner),
        }
    }

    /// Number of passes currently in flight.
    pub fn active(&self) -> usize {
        self.inner.active.load(Ordering::SeqCst)
    }

    /// Wait until no pass is in flight, up to `timeout`.
    ///
    /// Returns `true` if the tracker drained, `false` on timeout.
    pub async fn wait_idle(&self, timeout: Duration) -> bool {
        tokio::time::timeout(timeout, async {
            loop {
                // Register before checking to avoid missing a wakeup between
                // the load and the await.
                let notified = self.inner.idle.notified();
                if self.inner.active.load(Ordering::SeqCst) == 0 {
                    return;
                }
                notified.await;
            }
        })
        .await
        .is_ok()
    }
}

/// RAII guard marking one in-flight pass.
pub struct RunGuard {
    inner: Arc<TrackerInner>,
}

impl Drop for RunGuard {
    fn drop(&mut self) {
        if self.inner.active.fetch_sub(1, Ordering::SeqCst) == 1 {
            self.inner.idle.notify_waiters();
        }
    }
}
