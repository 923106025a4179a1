//! Per-run cooperative cancellation
//!
//! A fresh handle is issued for every run so a stale cancellation from a
//! previous run can never abort a new one. Cancellation takes effect at the
//! inter-tick wait boundary; an in-flight tick always finishes.

use std::sync::{Arc, Condvar, Mutex};
use std::time::Duration;

/// Cancellable delay used by the tick loop
#[derive(Debug, Clone)]
pub struct CancelHandle {
    inner: Arc<CancelInner>,
}

#[derive(Debug)]
struct CancelInner {
    cancelled: Mutex<bool>,
    signal: Condvar,
}

impl CancelHandle {
    /// Create a fresh, uncancelled handle
    pub fn new() -> Self {
        CancelHandle {
            inner: Arc::new(CancelInner {
                cancelled: Mutex::new(false),
                signal: Condvar::new(),
            }),
        }
    }

    /// Request cancellation and wake any in-progress wait
    pub fn cancel(&self) {
        let mut cancelled = self
            .inner
            .cancelled
            .lock()
            .expect("cancellation lock poisoned");
        *cancelled = true;
        self.inner.signal.notify_all();
    }

    /// Whether cancellation has been requested
    pub fn is_cancelled(&self) -> bool {
        *self
            .inner
            .cancelled
            .lock()
            .expect("cancellation lock poisoned")
    }

    /// Block for up to `timeout`, returning early on cancellation
    ///
    /// Returns `true` if the handle was cancelled before the timeout
    /// elapsed.
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        let cancelled = self
            .inner
            .cancelled
            .lock()
            .expect("cancellation lock poisoned");
        let (cancelled, _) = self
            .inner
            .signal
            .wait_timeout_while(cancelled, timeout, |cancelled| !*cancelled)
            .expect("cancellation lock poisoned");
        *cancelled
    }
}

impl Default for CancelHandle {
    fn default() -> Self {
        CancelHandle::new()
    }
}
