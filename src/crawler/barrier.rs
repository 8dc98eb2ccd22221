//! Layer barrier for the breadth-first driver
//!
//! Each crawl layer dispatches one asynchronous job per link, and a link's
//! processing can hop between the fetch and extraction pools before it
//! resolves. The driver must not build the next layer until every link of
//! the current one has reached a terminal state: rejected at screening,
//! failed to fetch, or finished extraction.
//!
//! The barrier is a counting latch created per layer with one party per
//! link. Parties hold an [`Arrival`] token that signals the barrier when
//! dropped, so every exit path of a job — including a discard during
//! shutdown — arrives exactly once without each branch having to remember
//! to do so.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;

/// Barrier releasing the driver once all parties of a layer have resolved
pub(crate) struct LayerBarrier {
    inner: Arc<Inner>,
}

struct Inner {
    remaining: AtomicUsize,
    done: Notify,
}

impl LayerBarrier {
    /// Creates a barrier expecting `parties` arrivals
    pub(crate) fn new(parties: usize) -> Self {
        Self {
            inner: Arc::new(Inner {
                remaining: AtomicUsize::new(parties),
                done: Notify::new(),
            }),
        }
    }

    /// Mints the arrival token for one party
    ///
    /// The caller must mint exactly as many tokens as the barrier was
    /// constructed with, one per dispatched link.
    pub(crate) fn join(&self) -> Arrival {
        Arrival {
            inner: Arc::clone(&self.inner),
        }
    }

    /// Waits until every party has arrived
    ///
    /// Returns immediately for a zero-party barrier.
    pub(crate) async fn wait(&self) {
        loop {
            let notified = self.inner.done.notified();
            if self.inner.remaining.load(Ordering::Acquire) == 0 {
                return;
            }
            notified.await;
        }
    }
}

/// One party's arrival token; arrives at its barrier on drop
pub(crate) struct Arrival {
    inner: Arc<Inner>,
}

impl Drop for Arrival {
    fn drop(&mut self) {
        if self.inner.remaining.fetch_sub(1, Ordering::AcqRel) == 1 {
            self.inner.done.notify_waiters();
        }
    }
}
