//! Crawler core
//!
//! This module contains the concurrency machinery of the crawl:
//! - Bounded fetch and extraction pools shared by all crawls
//! - Per-host admission with FIFO queuing and host-state eviction
//! - Layer-barrier synchronization for the breadth-first driver
//! - Per-crawl result and error aggregation

mod barrier;
mod coordinator;
mod gate;
mod task;

pub use coordinator::Crawler;
pub use task::CrawlResult;
