use dashmap::DashMap;
use mxcache_domain::DomainName;
use rustc_hash::FxBuildHasher;
use std::sync::Arc;
use tokio::sync::watch;

type InflightSender<T> = Arc<watch::Sender<Option<T>>>;
type InflightMap<T> = DashMap<DomainName, InflightSender<T>, FxBuildHasher>;

/// Upstream lookups currently running, one per domain.
///
/// The first caller for a domain becomes the leader and performs the lookup;
/// later callers subscribe and wait for the leader to publish.
pub(super) struct InflightTable<T> {
    entries: Arc<InflightMap<T>>,
}

pub(super) enum InflightRole<T: Clone + Send + Sync + 'static> {
    Leader(InflightLeaderGuard<T>),
    Follower(watch::Receiver<Option<T>>),
}

impl<T: Clone + Send + Sync + 'static> InflightTable<T> {
    pub fn new() -> Self {
        Self {
            entries: Arc::new(DashMap::with_hasher(FxBuildHasher)),
        }
    }

    pub fn register_or_join(&self, domain: &DomainName) -> InflightRole<T> {
        match self.entries.entry(domain.clone()) {
            dashmap::Entry::Occupied(e) => {
                let rx = e.get().subscribe();
                drop(e);
                InflightRole::Follower(rx)
            }
            dashmap::Entry::Vacant(e) => {
                let (tx, _rx) = watch::channel(None::<T>);
                let tx = Arc::new(tx);
                e.insert(Arc::clone(&tx));
                InflightRole::Leader(InflightLeaderGuard {
                    entries: Arc::clone(&self.entries),
                    slot: Some((domain.clone(), tx)),
                })
            }
        }
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Held by the leader for the duration of its lookup. Dropping it without
/// publishing wakes followers with `None`.
///
/// The slot is released once. Removal only matches this guard's own sender,
/// so a leader registered after it is never evicted.
pub(super) struct InflightLeaderGuard<T> {
    entries: Arc<InflightMap<T>>,
    slot: Option<(DomainName, InflightSender<T>)>,
}

impl<T> InflightLeaderGuard<T> {
    pub fn publish(mut self, value: T) {
        self.release(Some(value));
    }

    fn release(&mut self, value: Option<T>) {
        if let Some((domain, tx)) = self.slot.take() {
            self.entries
                .remove_if(&domain, |_, current| Arc::ptr_eq(current, &tx));
            let _ = tx.send(value);
        }
    }
}

impl<T> Drop for InflightLeaderGuard<T> {
    fn drop(&mut self) {
        self.release(None);
    }
}

/// Waits for the leader's outcome. `None` when the leader gave up.
pub(super) async fn wait_for_leader<T: Clone>(mut rx: watch::Receiver<Option<T>>) -> Option<T> {
    if let Some(value) = rx.borrow().clone() {
        return Some(value);
    }
    if rx.changed().await.is_ok() {
        if let Some(value) = rx.borrow().clone() {
            return Some(value);
        }
    }
    rx.borrow().clone()
}
