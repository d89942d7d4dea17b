//! Observability counters.
//!
//! A small fixed set of atomics, incremented on the request path without
//! any locking. Never exposed on the wire — whatever process embeds this
//! daemon reads them through [`Stats::snapshot`].

use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Default)]
pub struct Stats {
    pub bind_reqs: AtomicU64,
    pub bind_successes: AtomicU64,
    pub search_reqs: AtomicU64,
    pub search_successes: AtomicU64,
    pub closes: AtomicU64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StatsSnapshot {
    pub bind_reqs: u64,
    pub bind_successes: u64,
    pub search_reqs: u64,
    pub search_successes: u64,
    pub closes: u64,
}

impl Stats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_bind_req(&self) {
        self.bind_reqs.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_bind_success(&self) {
        self.bind_successes.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_search_req(&self) {
        self.search_reqs.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_search_success(&self) {
        self.search_successes.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_close(&self) {
        self.closes.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            bind_reqs: self.bind_reqs.load(Ordering::Relaxed),
            bind_successes: self.bind_successes.load(Ordering::Relaxed),
            search_reqs: self.search_reqs.load(Ordering::Relaxed),
            search_successes: self.search_successes.load(Ordering::Relaxed),
            closes: self.closes.load(Ordering::Relaxed),
        }
    }
}
