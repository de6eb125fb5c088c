//! Server metrics
//!
//! Atomic counters for connection and request accounting, plus per-status
//! counts. A one-line summary is logged every `SUMMARY_EVERY` requests, on
//! SIGUSR1, and at shutdown.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::logger;

const SUMMARY_EVERY: u64 = 1000;

#[derive(Default)]
pub struct Metrics {
    connections: AtomicU64,
    requests: AtomicU64,
    timeouts: AtomicU64,
    errors: AtomicU64,
    dropped: AtomicU64,
    rate_limited: AtomicU64,
    cache_hits: AtomicU64,
    cache_stores: AtomicU64,
    statuses: Mutex<BTreeMap<u16, u64>>,
}

impl Metrics {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn inc_connections(&self) {
        self.connections.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_timeouts(&self) {
        self.timeouts.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_errors(&self) {
        self.errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_dropped(&self) {
        self.dropped.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_rate_limited(&self) {
        self.rate_limited.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_cache_hit(&self) {
        self.cache_hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_cache_store(&self) {
        self.cache_stores.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a finished request. Every `SUMMARY_EVERY` requests the
    /// summary line is logged.
    pub fn observe_request(&self, status: u16) {
        let count = self.requests.fetch_add(1, Ordering::Relaxed) + 1;
        {
            let mut statuses = self.lock_statuses();
            *statuses.entry(status).or_insert(0) += 1;
        }
        if count % SUMMARY_EVERY == 0 {
            logger::log_metrics_summary(&self.summary());
        }
    }

    #[must_use]
    pub fn requests(&self) -> u64 {
        self.requests.load(Ordering::Relaxed)
    }

    /// One-line snapshot of all counters.
    #[must_use]
    pub fn summary(&self) -> String {
        let statuses = self
            .lock_statuses()
            .iter()
            .map(|(status, count)| format!("{status}:{count}"))
            .collect::<Vec<_>>()
            .join(" ");
        format!(
            "conns={} reqs={} timeouts={} errors={} dropped={} ratelimited={} cache(hit/store)={}/{} statuses=[{statuses}]",
            self.connections.load(Ordering::Relaxed),
            self.requests.load(Ordering::Relaxed),
            self.timeouts.load(Ordering::Relaxed),
            self.errors.load(Ordering::Relaxed),
            self.dropped.load(Ordering::Relaxed),
            self.rate_limited.load(Ordering::Relaxed),
            self.cache_hits.load(Ordering::Relaxed),
            self.cache_stores.load(Ordering::Relaxed),
        )
    }

    fn lock_statuses(&self) -> MutexGuard<'_, BTreeMap<u16, u64>> {
        self.statuses.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_in_summary() {
        let metrics = Metrics::new();
        metrics.inc_connections();
        metrics.inc_dropped();
        metrics.inc_rate_limited();
        metrics.inc_cache_hit();
        metrics.inc_cache_store();

        let summary = metrics.summary();
        assert!(summary.contains("conns=1"));
        assert!(summary.contains("dropped=1"));
        assert!(summary.contains("ratelimited=1"));
        assert!(summary.contains("cache(hit/store)=1/1"));
    }

    #[test]
    fn test_status_counts() {
        let metrics = Metrics::new();
        metrics.observe_request(200);
        metrics.observe_request(200);
        metrics.observe_request(404);

        assert_eq!(metrics.requests(), 3);
        let summary = metrics.summary();
        assert!(summary.contains("reqs=3"));
        assert!(summary.contains("200:2"));
        assert!(summary.contains("404:1"));
    }

    #[test]
    fn test_empty_summary() {
        let metrics = Metrics::new();
        assert!(metrics.summary().contains("reqs=0"));
        assert!(metrics.summary().contains("statuses=[]"));
    }
}
