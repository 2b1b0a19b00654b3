//! Counted barrier for the recursive fan-out strategy
//!
//! Every unit of outstanding work holds a `WaitGroupGuard`. Dropping the
//! guard releases the unit, so the decrement happens exactly once on every
//! exit path of the task that owns it, including unwinding.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;

#[derive(Debug, Default)]
struct Inner {
    count: AtomicUsize,
    notify: Notify,
}

/// Atomic counted barrier resolved when the count returns to zero
///
/// Cloning a `WaitGroup` yields another handle to the same barrier.
#[derive(Debug, Clone, Default)]
pub struct WaitGroup {
    inner: Arc<Inner>,
}

impl WaitGroup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Increments the count by one and returns the guard owning that unit
    ///
    /// Take the guard before spawning the task that will own it, so the
    /// count cannot reach zero while the task is still being scheduled.
    #[must_use = "dropping the guard immediately releases the unit"]
    pub fn add(&self) -> WaitGroupGuard {
        self.inner.count.fetch_add(1, Ordering::SeqCst);
        WaitGroupGuard {
            inner: Arc::clone(&self.inner),
        }
    }

    /// Number of outstanding units
    pub fn count(&self) -> usize {
        self.inner.count.load(Ordering::SeqCst)
    }

    /// Waits until the count is zero
    ///
    /// Returns immediately if nothing is outstanding.
    pub async fn wait(&self) {
        loop {
            let notified = self.inner.notify.notified();
            tokio::pin!(notified);
            // Register for the wakeup before reading the count so a release
            // that lands in between is not missed.
            notified.as_mut().enable();

            if self.count() == 0 {
                return;
            }

            notified.await;
        }
    }
}

/// One outstanding unit of a `WaitGroup`, released on drop
#[derive(Debug)]
pub struct WaitGroupGuard {
    inner: Arc<Inner>,
}

impl Drop for WaitGroupGuard {
    fn drop(&mut self) {
        if self.inner.count.fetch_sub(1, Ordering::SeqCst) == 1 {
            self.inner.notify.notify_waiters();
        }
    }
}
