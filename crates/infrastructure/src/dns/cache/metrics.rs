use mxcache_application::ports::RecordMetricsSnapshot;
use mxcache_domain::{AddressKind, AddressRecord};
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};

/// Insert counters, bumped only by the winning writer of a list.
#[derive(Default)]
pub struct RecordMetrics {
    pub a_records: AtomicU64,
    pub aaaa_records: AtomicU64,
    pub mx_records: AtomicU64,
    pub address_sets: AtomicU64,
    pub mail_exchange_sets: AtomicU64,
}

impl RecordMetrics {
    pub fn record_addresses(&self, records: &[AddressRecord]) {
        let ipv4 = records
            .iter()
            .filter(|r| r.kind == AddressKind::Ipv4)
            .count() as u64;
        let ipv6 = records.len() as u64 - ipv4;

        self.a_records.fetch_add(ipv4, AtomicOrdering::Relaxed);
        self.aaaa_records.fetch_add(ipv6, AtomicOrdering::Relaxed);
        self.address_sets.fetch_add(1, AtomicOrdering::Relaxed);
    }

    pub fn record_mail_exchangers(&self, count: usize) {
        self.mx_records
            .fetch_add(count as u64, AtomicOrdering::Relaxed);
        self.mail_exchange_sets
            .fetch_add(1, AtomicOrdering::Relaxed);
    }

    pub fn snapshot(&self) -> RecordMetricsSnapshot {
        RecordMetricsSnapshot {
            a_records: self.a_records.load(AtomicOrdering::Relaxed),
            aaaa_records: self.aaaa_records.load(AtomicOrdering::Relaxed),
            mx_records: self.mx_records.load(AtomicOrdering::Relaxed),
            address_sets: self.address_sets.load(AtomicOrdering::Relaxed),
            mail_exchange_sets: self.mail_exchange_sets.load(AtomicOrdering::Relaxed),
        }
    }
}
