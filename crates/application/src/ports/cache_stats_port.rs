use serde::Serialize;

/// Counters of records published into the store, by type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RecordMetricsSnapshot {
    pub a_records: u64,
    pub aaaa_records: u64,
    pub mx_records: u64,
    pub address_sets: u64,
    pub mail_exchange_sets: u64,
}

impl RecordMetricsSnapshot {
    pub fn total_records(&self) -> u64 {
        self.a_records + self.aaaa_records + self.mx_records
    }
}

pub trait CacheStatsPort: Send + Sync {
    /// Number of domains with at least one resolved list.
    fn domain_count(&self) -> usize;

    fn metrics_snapshot(&self) -> RecordMetricsSnapshot;
}
