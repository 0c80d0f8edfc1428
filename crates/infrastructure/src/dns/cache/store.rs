use super::entry::CacheEntry;
use super::metrics::RecordMetrics;
use dashmap::DashMap;
use mxcache_application::ports::{
    AddressSet, CacheStatsPort, MailExchangeSet, PutOutcome, RecordMetricsSnapshot, RecordStore,
};
use mxcache_domain::{AddressRecord, DomainName, MailExchangeRecord};
use rustc_hash::FxBuildHasher;
use std::sync::Arc;
use tracing::debug;

/// Sharded in-memory record store.
///
/// Check-and-insert runs under the shard's write lock, so concurrent
/// writers for one domain race safely: the first publishes, the rest get
/// the published value back. Entries are never evicted.
pub struct InMemoryRecordStore {
    entries: DashMap<DomainName, CacheEntry, FxBuildHasher>,
    metrics: RecordMetrics,
}

impl InMemoryRecordStore {
    pub fn new() -> Self {
        Self {
            entries: DashMap::with_hasher(FxBuildHasher),
            metrics: RecordMetrics::default(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for InMemoryRecordStore {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordStore for InMemoryRecordStore {
    fn get_addresses(&self, domain: &DomainName) -> Option<AddressSet> {
        self.entries
            .get(domain)
            .and_then(|entry| entry.addresses.clone())
    }

    fn get_mail_exchangers(&self, domain: &DomainName) -> Option<MailExchangeSet> {
        self.entries
            .get(domain)
            .and_then(|entry| entry.mail_exchangers.clone())
    }

    fn put_addresses_if_absent(
        &self,
        domain: &DomainName,
        records: Vec<AddressRecord>,
    ) -> PutOutcome<AddressSet> {
        let mut entry = self.entries.entry(domain.clone()).or_default();
        if let Some(existing) = &entry.addresses {
            return PutOutcome::existing(Arc::clone(existing));
        }

        self.metrics.record_addresses(&records);
        let stored: AddressSet = Arc::from(records);
        entry.addresses = Some(Arc::clone(&stored));
        debug!(domain = %domain, count = stored.len(), "Addresses stored");

        PutOutcome::inserted(stored)
    }

    fn put_mail_exchangers_if_absent(
        &self,
        domain: &DomainName,
        records: Vec<MailExchangeRecord>,
    ) -> PutOutcome<MailExchangeSet> {
        let mut entry = self.entries.entry(domain.clone()).or_default();
        if let Some(existing) = &entry.mail_exchangers {
            return PutOutcome::existing(Arc::clone(existing));
        }

        self.metrics.record_mail_exchangers(records.len());
        let stored: MailExchangeSet = Arc::from(records);
        entry.mail_exchangers = Some(Arc::clone(&stored));
        debug!(domain = %domain, count = stored.len(), "Mail exchangers stored");

        PutOutcome::inserted(stored)
    }

    fn is_fully_resolved(&self, domain: &DomainName) -> bool {
        self.entries
            .get(domain)
            .is_some_and(|entry| entry.is_complete())
    }
}

impl CacheStatsPort for InMemoryRecordStore {
    fn domain_count(&self) -> usize {
        self.len()
    }

    fn metrics_snapshot(&self) -> RecordMetricsSnapshot {
        self.metrics.snapshot()
    }
}
