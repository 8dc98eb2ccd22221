//! Per-crawl state and the breadth-first driver
//!
//! One [`CrawlTask`] exists per top-level crawl call. It owns the result
//! sets for that call and walks the link graph layer by layer: every link
//! of the current layer is screened and, if accepted, run through the
//! per-host gate and the fetch pool; successful fetches hand their page to
//! the extraction pool, whose harvest becomes the next layer. The driver
//! suspends on the layer barrier until every link of the layer has
//! resolved, then deduplicates the harvest against everything this task has
//! already seen.

use crate::crawler::barrier::{Arrival, LayerBarrier};
use crate::crawler::coordinator::{InFlight, WorkGuard};
use crate::crawler::gate::HostGate;
use crate::fetch::{Fetcher, Page};
use crate::url::host_of;
use crate::PageError;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use tokio::sync::Semaphore;

/// Outcome of one crawl
///
/// `errors` is partial-failure information: a crawl that failed on some or
/// even all links still returns normally, and `downloaded` remains valid. A
/// link appears in both sets exactly when its page was fetched but its
/// links could not be extracted.
#[derive(Debug, Default)]
pub struct CrawlResult {
    /// Links whose pages were fetched
    pub downloaded: HashSet<String>,

    /// Links that failed, with the reason
    pub errors: HashMap<String, PageError>,
}

/// Screening predicate for one crawl
///
/// Either an open crawl with substring excludes, or a crawl restricted to
/// an explicit host allow-list. Links rejected here are neither downloaded
/// nor errors; they simply fall out of the crawl.
pub(crate) enum Screen {
    Open { excludes: Vec<String> },
    Restricted { hosts: HashSet<String> },
}

impl Screen {
    pub(crate) fn open(excludes: Vec<String>) -> Self {
        Self::Open { excludes }
    }

    pub(crate) fn restricted(hosts: &[String]) -> Self {
        Self::Restricted {
            hosts: hosts.iter().map(|h| h.to_lowercase()).collect(),
        }
    }

    fn is_excluded(&self, link: &str) -> bool {
        match self {
            Self::Open { excludes } => excludes.iter().any(|needle| link.contains(needle)),
            Self::Restricted { .. } => false,
        }
    }

    fn admits_host(&self, host: &str) -> bool {
        match self {
            Self::Open { .. } => true,
            Self::Restricted { hosts } => hosts.contains(host),
        }
    }
}

/// Private state and control flow for one crawl call
pub(crate) struct CrawlTask {
    fetcher: Arc<dyn Fetcher>,
    fetch_slots: Arc<Semaphore>,
    extract_slots: Arc<Semaphore>,
    gate: Arc<HostGate>,
    in_flight: InFlight,
    screen: Screen,

    downloaded: Mutex<HashSet<String>>,
    errors: Mutex<HashMap<String, PageError>>,
    skipped: Mutex<HashSet<String>>,
    hosts_used: Mutex<HashSet<String>>,
    harvest: Mutex<Vec<String>>,
}

impl CrawlTask {
    pub(crate) fn new(
        fetcher: Arc<dyn Fetcher>,
        fetch_slots: Arc<Semaphore>,
        extract_slots: Arc<Semaphore>,
        gate: Arc<HostGate>,
        in_flight: InFlight,
        screen: Screen,
    ) -> Self {
        Self {
            fetcher,
            fetch_slots,
            extract_slots,
            gate,
            in_flight,
            screen,
            downloaded: Mutex::new(HashSet::new()),
            errors: Mutex::new(HashMap::new()),
            skipped: Mutex::new(HashSet::new()),
            hosts_used: Mutex::new(HashSet::new()),
            harvest: Mutex::new(Vec::new()),
        }
    }

    /// Runs the breadth-first expansion from `seed`
    ///
    /// Depth counts link hops from the seed: depth 0 crawls nothing at all,
    /// depth 1 fetches the seed and its direct links, and so on. Each link
    /// is fetched at most once per task, however often it reappears in
    /// later layers.
    pub(crate) async fn run(self: Arc<Self>, seed: &str, depth: usize) -> CrawlResult {
        if depth == 0 {
            return CrawlResult::default();
        }

        let mut seen: HashSet<String> = HashSet::new();
        seen.insert(seed.to_string());
        let mut layer = vec![seed.to_string()];

        for hop in 0..=depth {
            if layer.is_empty() {
                break;
            }
            tracing::debug!(hop, links = layer.len(), "crawling layer");

            let barrier = LayerBarrier::new(layer.len());
            for link in layer.drain(..) {
                let task = Arc::clone(&self);
                let arrival = barrier.join();
                let work = self.in_flight.begin();
                tokio::spawn(async move {
                    task.process(link, arrival, work).await;
                });
            }
            barrier.wait().await;

            let mut harvest = self.harvest.lock().unwrap();
            for link in harvest.drain(..) {
                if seen.insert(link.clone()) {
                    layer.push(link);
                }
            }
        }

        let hosts_used = std::mem::take(&mut *self.hosts_used.lock().unwrap());
        for host in &hosts_used {
            self.gate.release(host);
        }

        let downloaded = std::mem::take(&mut *self.downloaded.lock().unwrap());
        let errors = std::mem::take(&mut *self.errors.lock().unwrap());
        tracing::info!(
            downloaded = downloaded.len(),
            failed = errors.len(),
            skipped = self.skipped.lock().unwrap().len(),
            "crawl finished"
        );

        CrawlResult { downloaded, errors }
    }

    /// Processes a single link through screening, admission, and fetch
    ///
    /// The arrival token travels with the link: it is dropped wherever the
    /// branch terminates, or handed to the extraction job on fetch success.
    async fn process(self: Arc<Self>, link: String, arrival: Arrival, _work: WorkGuard) {
        if self.screen.is_excluded(&link) {
            tracing::debug!(%link, "excluded by pattern");
            self.skipped.lock().unwrap().insert(link);
            return;
        }

        let host = match host_of(&link) {
            Ok(host) => host,
            Err(err) => {
                self.record_error(link, PageError::Link(err));
                return;
            }
        };

        if !self.screen.admits_host(&host) {
            tracing::debug!(%link, %host, "host not in allow-list");
            self.skipped.lock().unwrap().insert(link);
            return;
        }

        self.hosts_used.lock().unwrap().insert(host.clone());
        let lease = self.gate.checkout(&host);
        let Ok(admitted) = lease.admit().await else {
            return;
        };

        // Global fetch slot; fails only once the crawler is shutting down,
        // in which case the job is discarded
        let Ok(fetch_slot) = self.fetch_slots.clone().acquire_owned().await else {
            return;
        };

        let fetched = self.fetcher.fetch(&link).await;

        drop(fetch_slot);
        drop(admitted);
        drop(lease);

        let page = match fetched {
            Ok(page) => page,
            Err(err) => {
                tracing::debug!(%link, %err, "fetch failed");
                self.record_error(link, PageError::Fetch(err));
                return;
            }
        };

        self.downloaded.lock().unwrap().insert(link.clone());

        // Extraction is its own job on the extraction pool; the arrival
        // token moves with it
        let task = Arc::clone(&self);
        let work = self.in_flight.begin();
        tokio::spawn(async move {
            task.extract(page, link, arrival, work).await;
        });
    }

    /// Enumerates a fetched page's links into the next-layer harvest
    async fn extract(
        self: Arc<Self>,
        page: Box<dyn Page>,
        link: String,
        _arrival: Arrival,
        _work: WorkGuard,
    ) {
        let Ok(_extract_slot) = self.extract_slots.clone().acquire_owned().await else {
            return;
        };

        match page.links().await {
            Ok(links) => {
                self.harvest.lock().unwrap().extend(links);
            }
            Err(err) => {
                // The page itself was downloaded; only its links are lost
                tracing::debug!(%link, %err, "link extraction failed");
                self.record_error(link, PageError::Extract(err));
            }
        }
    }

    fn record_error(&self, link: String, err: PageError) {
        self.errors.lock().unwrap().insert(link, err);
    }
}
