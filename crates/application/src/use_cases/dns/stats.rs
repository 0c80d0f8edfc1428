use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

/// Engine-side counters. Store-side counters live behind `CacheStatsPort`.
#[derive(Default)]
pub struct ResolutionStats {
    pub(super) hits: AtomicU64,
    pub(super) misses: AtomicU64,
    pub(super) coalesced: AtomicU64,
    pub(super) upstream_failures: AtomicU64,
    pub(super) suppressed: AtomicU64,
    pub(super) crawls_scheduled: AtomicU64,
    pub(super) crawls_skipped: AtomicU64,
    pub(super) crawls_cancelled: AtomicU64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ResolutionStatsSnapshot {
    pub hits: u64,
    pub misses: u64,
    pub coalesced: u64,
    pub upstream_failures: u64,
    pub suppressed: u64,
    pub crawls_scheduled: u64,
    pub crawls_skipped: u64,
    pub crawls_cancelled: u64,
}

impl ResolutionStatsSnapshot {
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total > 0 {
            (self.hits as f64 / total as f64) * 100.0
        } else {
            0.0
        }
    }
}

impl ResolutionStats {
    #[inline]
    pub(super) fn bump(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> ResolutionStatsSnapshot {
        ResolutionStatsSnapshot {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            coalesced: self.coalesced.load(Ordering::Relaxed),
            upstream_failures: self.upstream_failures.load(Ordering::Relaxed),
            suppressed: self.suppressed.load(Ordering::Relaxed),
            crawls_scheduled: self.crawls_scheduled.load(Ordering::Relaxed),
            crawls_skipped: self.crawls_skipped.load(Ordering::Relaxed),
            crawls_cancelled: self.crawls_cancelled.load(Ordering::Relaxed),
        }
    }
}
