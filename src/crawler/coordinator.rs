//! Crawler orchestrator
//!
//! The [`Crawler`] is the long-lived, shared entry point: it owns the
//! bounded fetch and extraction pools, the per-host admission gate, and the
//! shutdown latch. Any number of crawls may run against it concurrently;
//! they share the pools and the gate but keep their own result state.

use crate::config::{validate_limits, Limits};
use crate::crawler::gate::HostGate;
use crate::crawler::task::{CrawlResult, CrawlTask, Screen};
use crate::fetch::Fetcher;
use crate::ConfigResult;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::{Notify, Semaphore};

/// Concurrent, depth-bounded link crawler
///
/// Constructed once with a [`Fetcher`] and validated [`Limits`], then
/// shared: `crawl*` methods take `&self` and are safe to call from many
/// tasks at once. [`Crawler::shutdown`] discards pending work and drains
/// the pools.
pub struct Crawler {
    fetcher: Arc<dyn Fetcher>,
    fetch_slots: Arc<Semaphore>,
    extract_slots: Arc<Semaphore>,
    gate: Arc<HostGate>,
    in_flight: InFlight,
    closed: AtomicBool,
}

impl Crawler {
    /// Creates a crawler
    ///
    /// Fails with [`crate::ConfigError::Validation`] if any limit is zero.
    pub fn new(fetcher: Arc<dyn Fetcher>, limits: &Limits) -> ConfigResult<Self> {
        validate_limits(limits)?;

        Ok(Self {
            fetcher,
            fetch_slots: Arc::new(Semaphore::new(limits.downloads)),
            extract_slots: Arc::new(Semaphore::new(limits.extractors)),
            gate: Arc::new(HostGate::new(limits.per_host)),
            in_flight: InFlight::new(),
            closed: AtomicBool::new(false),
        })
    }

    /// Crawls from `seed` up to `depth` link hops, following every host
    ///
    /// Depth 0 crawls nothing and returns an empty result.
    pub async fn crawl(&self, seed: &str, depth: usize) -> CrawlResult {
        self.run(Screen::open(Vec::new()), seed, depth).await
    }

    /// Like [`Crawler::crawl`], skipping links that contain any exclude
    /// pattern as a substring
    pub async fn crawl_with_excludes(
        &self,
        seed: &str,
        depth: usize,
        excludes: &[String],
    ) -> CrawlResult {
        self.run(Screen::open(excludes.to_vec()), seed, depth).await
    }

    /// Like [`Crawler::crawl`], restricted to an explicit host allow-list
    ///
    /// Links whose host is not listed are skipped without being recorded as
    /// errors.
    pub async fn crawl_restricted(
        &self,
        seed: &str,
        depth: usize,
        hosts: &[String],
    ) -> CrawlResult {
        self.run(Screen::restricted(hosts), seed, depth).await
    }

    async fn run(&self, screen: Screen, seed: &str, depth: usize) -> CrawlResult {
        if self.closed.load(Ordering::SeqCst) {
            tracing::warn!(%seed, "crawl requested after shutdown");
            return CrawlResult::default();
        }

        tracing::info!(%seed, depth, "starting crawl");
        let task = Arc::new(CrawlTask::new(
            Arc::clone(&self.fetcher),
            Arc::clone(&self.fetch_slots),
            Arc::clone(&self.extract_slots),
            Arc::clone(&self.gate),
            self.in_flight.clone(),
            screen,
        ));
        task.run(seed, depth).await
    }

    /// Stops accepting new work and waits for in-flight jobs to finish
    ///
    /// Jobs that have not yet acquired a pool slot are discarded; a crawl
    /// racing the shutdown returns with whatever completed before the close
    /// rather than hanging. Idempotent: later calls just wait for the
    /// drain.
    pub async fn shutdown(&self) {
        if !self.closed.swap(true, Ordering::SeqCst) {
            tracing::info!("shutting down; pending jobs will be discarded");
            self.fetch_slots.close();
            self.extract_slots.close();
        }
        self.in_flight.drained().await;
    }
}

/// Gauge of jobs currently occupying (or queued into) the pools
///
/// Shutdown waits on this to drain rather than polling the semaphores,
/// which are closed at that point.
#[derive(Clone)]
pub(crate) struct InFlight {
    inner: Arc<Gauge>,
}

struct Gauge {
    active: AtomicUsize,
    idle: Notify,
}

impl InFlight {
    fn new() -> Self {
        Self {
            inner: Arc::new(Gauge {
                active: AtomicUsize::new(0),
                idle: Notify::new(),
            }),
        }
    }

    /// Registers one job; the guard unregisters it on drop
    pub(crate) fn begin(&self) -> WorkGuard {
        self.inner.active.fetch_add(1, Ordering::SeqCst);
        WorkGuard {
            inner: Arc::clone(&self.inner),
        }
    }

    /// Waits until no jobs remain
    pub(crate) async fn drained(&self) {
        loop {
            let notified = self.inner.idle.notified();
            if self.inner.active.load(Ordering::SeqCst) == 0 {
                return;
            }
            notified.await;
        }
    }
}

pub(crate) struct WorkGuard {
    inner: Arc<Gauge>,
}

impl Drop for WorkGuard {
    fn drop(&mut self) {
        if self.inner.active.fetch_sub(1, Ordering::SeqCst) == 1 {
            self.inner.idle.notify_waiters();
        }
    }
}
