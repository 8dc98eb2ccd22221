//! Per-host admission gate
//!
//! The fetch pool caps global concurrency, but without a per-host cap a
//! single host could absorb the whole pool. The gate bounds how many
//! fetches run against one host at a time; excess jobs queue in submission
//! order on that host's fair semaphore and are promoted FIFO as running
//! fetches complete.
//!
//! Host entries are created lazily, shared by all crawls touching the host,
//! and evicted once no registered jobs remain, so host bookkeeping does not
//! grow without bound across a long-lived crawler. The gate's map lock is
//! held only for lookup, insert, and eviction; waiting for admission is
//! per-host and never serializes unrelated hosts.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::{AcquireError, OwnedSemaphorePermit, Semaphore};

/// Per-host concurrency limiter with FIFO pending queues
pub(crate) struct HostGate {
    per_host: usize,
    hosts: Mutex<HashMap<String, Arc<HostSlot>>>,
}

/// State for one host: the admission semaphore plus a count of registered
/// jobs (queued or running) that keeps the entry alive
struct HostSlot {
    permits: Arc<Semaphore>,
    jobs: AtomicUsize,
}

impl HostGate {
    pub(crate) fn new(per_host: usize) -> Self {
        Self {
            per_host,
            hosts: Mutex::new(HashMap::new()),
        }
    }

    /// Registers one unit of work for `host`
    ///
    /// Creates the host entry if this is the first reference. The returned
    /// lease keeps the entry alive until the job completes; call
    /// [`HostLease::admit`] to wait for an admission permit.
    pub(crate) fn checkout(&self, host: &str) -> HostLease {
        let mut hosts = self.hosts.lock().unwrap();
        let slot = hosts
            .entry(host.to_string())
            .or_insert_with(|| {
                Arc::new(HostSlot {
                    permits: Arc::new(Semaphore::new(self.per_host)),
                    jobs: AtomicUsize::new(0),
                })
            })
            .clone();

        // Counted under the map lock so release() cannot evict in between
        slot.jobs.fetch_add(1, Ordering::SeqCst);

        HostLease { slot }
    }

    /// Evicts `host` if no registered jobs remain
    ///
    /// Called by a crawl task once it is done referencing the host. Another
    /// crawl still using the host keeps the entry alive through its own
    /// leases; the last releaser removes it.
    pub(crate) fn release(&self, host: &str) {
        let mut hosts = self.hosts.lock().unwrap();
        if let Some(slot) = hosts.get(host) {
            if slot.jobs.load(Ordering::SeqCst) == 0 {
                hosts.remove(host);
            }
        }
    }

    #[cfg(test)]
    pub(crate) fn tracked_hosts(&self) -> usize {
        self.hosts.lock().unwrap().len()
    }
}

/// One registered job's handle on a host entry
///
/// Dropping the lease marks the job complete. Hold it for the whole fetch:
/// the admission permit must not outlive it.
pub(crate) struct HostLease {
    slot: Arc<HostSlot>,
}

impl HostLease {
    /// Waits for one of the host's admission permits, FIFO-fair
    pub(crate) async fn admit(&self) -> Result<OwnedSemaphorePermit, AcquireError> {
        self.slot.permits.clone().acquire_owned().await
    }
}

impl Drop for HostLease {
    fn drop(&mut self) {
        self.slot.jobs.fetch_sub(1, Ordering::SeqCst);
    }
}
