use dashmap::DashSet;
use mxcache_domain::DomainName;
use rustc_hash::FxBuildHasher;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

/// Admission control for background MX-host resolution.
///
/// A host is marked before its task is spawned and stays marked once the
/// crawl succeeds, so a cycle of MX references terminates. Every marked host
/// gets a task; the semaphore caps how many of them resolve at once and the
/// rest wait for a slot.
pub(super) struct CrawlGate {
    visited: DashSet<DomainName, FxBuildHasher>,
    permits: Arc<Semaphore>,
    pending: AtomicUsize,
    capacity: usize,
}

/// Counts a spawned crawl until its task finishes.
pub(super) struct PendingCrawl {
    gate: Arc<CrawlGate>,
}

impl Drop for PendingCrawl {
    fn drop(&mut self) {
        self.gate.pending.fetch_sub(1, Ordering::AcqRel);
    }
}

impl CrawlGate {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            visited: DashSet::with_hasher(FxBuildHasher),
            permits: Arc::new(Semaphore::new(capacity)),
            pending: AtomicUsize::new(0),
            capacity,
        }
    }

    /// Returns false when the host was already marked.
    pub fn mark(&self, host: &DomainName) -> bool {
        self.visited.insert(host.clone())
    }

    pub fn unmark(&self, host: &DomainName) {
        self.visited.remove(host);
    }

    pub fn enqueue(gate: &Arc<Self>) -> PendingCrawl {
        gate.pending.fetch_add(1, Ordering::AcqRel);
        PendingCrawl {
            gate: Arc::clone(gate),
        }
    }

    /// Waits for a free crawl slot.
    pub async fn acquire(&self) -> Option<OwnedSemaphorePermit> {
        Arc::clone(&self.permits).acquire_owned().await.ok()
    }

    pub fn running(&self) -> usize {
        self.capacity - self.permits.available_permits()
    }

    /// Spawned crawls not yet finished, running or waiting for a slot.
    pub fn pending(&self) -> usize {
        self.pending.load(Ordering::Acquire)
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }
}
