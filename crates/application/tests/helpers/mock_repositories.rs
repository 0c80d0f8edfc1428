#![allow(dead_code)]

use async_trait::async_trait;
use mxcache_application::ports::{
    AddressSet, CacheStatsPort, MailExchangeSet, PutOutcome, RecordMetricsSnapshot, RecordStore,
    UpstreamResolver,
};
use mxcache_application::use_cases::{ResolutionSettings, ResolveDomainUseCase};
use mxcache_domain::{
    AddressKind, AddressRecord, DomainError, DomainName, MailExchangeRecord, MailExchanger,
};
use std::collections::HashMap;
use std::net::IpAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, RwLock};
use std::time::Duration;

#[derive(Default)]
struct StoredEntry {
    addresses: Option<AddressSet>,
    mail_exchangers: Option<MailExchangeSet>,
}

/// Mutex-backed store; enough for exercising the engine's contract.
#[derive(Default)]
pub struct MockRecordStore {
    entries: Mutex<HashMap<DomainName, StoredEntry>>,
    a_records: AtomicUsize,
    aaaa_records: AtomicUsize,
    mx_records: AtomicUsize,
}

impl MockRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed_addresses(&self, domain: &str, ips: &[&str]) {
        let domain = DomainName::new(domain).unwrap();
        let records = ips
            .iter()
            .map(|ip| AddressRecord::new(domain.clone(), ip.parse().unwrap()))
            .collect();
        self.put_addresses_if_absent(&domain, records);
    }

    pub fn seed_mail_exchangers(&self, domain: &str, hosts: &[(u16, &str)]) {
        let domain = DomainName::new(domain).unwrap();
        let records = hosts
            .iter()
            .map(|(preference, host)| {
                MailExchangeRecord::new(
                    domain.clone(),
                    *preference,
                    DomainName::new(host).unwrap(),
                )
            })
            .collect();
        self.put_mail_exchangers_if_absent(&domain, records);
    }

    pub fn has_addresses(&self, domain: &str) -> bool {
        self.get_addresses(&DomainName::new(domain).unwrap())
            .is_some()
    }

    pub fn has_mail_exchangers(&self, domain: &str) -> bool {
        self.get_mail_exchangers(&DomainName::new(domain).unwrap())
            .is_some()
    }
}

impl RecordStore for MockRecordStore {
    fn get_addresses(&self, domain: &DomainName) -> Option<AddressSet> {
        let entries = self.entries.lock().unwrap();
        entries.get(domain).and_then(|e| e.addresses.clone())
    }

    fn get_mail_exchangers(&self, domain: &DomainName) -> Option<MailExchangeSet> {
        let entries = self.entries.lock().unwrap();
        entries.get(domain).and_then(|e| e.mail_exchangers.clone())
    }

    fn put_addresses_if_absent(
        &self,
        domain: &DomainName,
        records: Vec<AddressRecord>,
    ) -> PutOutcome<AddressSet> {
        let mut entries = self.entries.lock().unwrap();
        let entry = entries.entry(domain.clone()).or_default();
        if let Some(existing) = &entry.addresses {
            return PutOutcome::existing(Arc::clone(existing));
        }
        for record in &records {
            match record.kind {
                AddressKind::Ipv4 => self.a_records.fetch_add(1, Ordering::Relaxed),
                AddressKind::Ipv6 => self.aaaa_records.fetch_add(1, Ordering::Relaxed),
            };
        }
        let stored: AddressSet = Arc::from(records);
        entry.addresses = Some(Arc::clone(&stored));
        PutOutcome::inserted(stored)
    }

    fn put_mail_exchangers_if_absent(
        &self,
        domain: &DomainName,
        records: Vec<MailExchangeRecord>,
    ) -> PutOutcome<MailExchangeSet> {
        let mut entries = self.entries.lock().unwrap();
        let entry = entries.entry(domain.clone()).or_default();
        if let Some(existing) = &entry.mail_exchangers {
            return PutOutcome::existing(Arc::clone(existing));
        }
        self.mx_records.fetch_add(records.len(), Ordering::Relaxed);
        let stored: MailExchangeSet = Arc::from(records);
        entry.mail_exchangers = Some(Arc::clone(&stored));
        PutOutcome::inserted(stored)
    }
}

impl CacheStatsPort for MockRecordStore {
    fn domain_count(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    fn metrics_snapshot(&self) -> RecordMetricsSnapshot {
        RecordMetricsSnapshot {
            a_records: self.a_records.load(Ordering::Relaxed) as u64,
            aaaa_records: self.aaaa_records.load(Ordering::Relaxed) as u64,
            mx_records: self.mx_records.load(Ordering::Relaxed) as u64,
            address_sets: 0,
            mail_exchange_sets: 0,
        }
    }
}

/// Scripted upstream. Unknown names answer with an empty, successful result.
#[derive(Clone, Default)]
pub struct MockUpstreamResolver {
    addresses: Arc<RwLock<HashMap<String, Result<Vec<IpAddr>, DomainError>>>>,
    mail_exchangers: Arc<RwLock<HashMap<String, Result<Vec<MailExchanger>, DomainError>>>>,
    address_calls: Arc<RwLock<HashMap<String, usize>>>,
    mx_calls: Arc<RwLock<HashMap<String, usize>>>,
    delay: Arc<RwLock<Duration>>,
    domain_delays: Arc<RwLock<HashMap<String, Duration>>>,
    in_flight: Arc<AtomicUsize>,
    max_in_flight: Arc<AtomicUsize>,
}

impl MockUpstreamResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_addresses(&self, domain: &str, ips: &[&str]) {
        let ips = ips.iter().map(|ip| ip.parse().unwrap()).collect();
        self.addresses
            .write()
            .unwrap()
            .insert(domain.to_string(), Ok(ips));
    }

    pub fn set_address_error(&self, domain: &str, error: DomainError) {
        self.addresses
            .write()
            .unwrap()
            .insert(domain.to_string(), Err(error));
    }

    pub fn set_mail_exchangers(&self, domain: &str, hosts: &[(u16, &str)]) {
        let hosts = hosts
            .iter()
            .map(|(preference, host)| MailExchanger::new(*preference, *host))
            .collect();
        self.mail_exchangers
            .write()
            .unwrap()
            .insert(domain.to_string(), Ok(hosts));
    }

    pub fn set_mail_exchanger_error(&self, domain: &str, error: DomainError) {
        self.mail_exchangers
            .write()
            .unwrap()
            .insert(domain.to_string(), Err(error));
    }

    pub fn set_delay(&self, delay: Duration) {
        *self.delay.write().unwrap() = delay;
    }

    /// Overrides the global delay for one name.
    pub fn set_domain_delay(&self, domain: &str, delay: Duration) {
        self.domain_delays
            .write()
            .unwrap()
            .insert(domain.to_string(), delay);
    }

    pub fn address_calls(&self, domain: &str) -> usize {
        self.address_calls
            .read()
            .unwrap()
            .get(domain)
            .copied()
            .unwrap_or(0)
    }

    pub fn mx_calls(&self, domain: &str) -> usize {
        self.mx_calls
            .read()
            .unwrap()
            .get(domain)
            .copied()
            .unwrap_or(0)
    }

    pub fn total_calls(&self) -> usize {
        let addresses: usize = self.address_calls.read().unwrap().values().sum();
        let mx: usize = self.mx_calls.read().unwrap().values().sum();
        addresses + mx
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    async fn simulate_latency(&self, domain: &DomainName) {
        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(current, Ordering::SeqCst);
        let delay = self
            .domain_delays
            .read()
            .unwrap()
            .get(domain.as_str())
            .copied()
            .unwrap_or_else(|| *self.delay.read().unwrap());
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl UpstreamResolver for MockUpstreamResolver {
    async fn resolve_addresses(&self, domain: &DomainName) -> Result<Vec<IpAddr>, DomainError> {
        *self
            .address_calls
            .write()
            .unwrap()
            .entry(domain.to_string())
            .or_insert(0) += 1;
        self.simulate_latency(domain).await;
        let scripted = self.addresses.read().unwrap().get(domain.as_str()).cloned();
        scripted.unwrap_or_else(|| Ok(vec![]))
    }

    async fn resolve_mail_exchangers(
        &self,
        domain: &DomainName,
    ) -> Result<Vec<MailExchanger>, DomainError> {
        *self
            .mx_calls
            .write()
            .unwrap()
            .entry(domain.to_string())
            .or_insert(0) += 1;
        self.simulate_latency(domain).await;
        let scripted = self
            .mail_exchangers
            .read()
            .unwrap()
            .get(domain.as_str())
            .cloned();
        scripted.unwrap_or_else(|| Ok(vec![]))
    }
}

pub fn name(raw: &str) -> DomainName {
    DomainName::new(raw).unwrap()
}

pub fn settings() -> ResolutionSettings {
    ResolutionSettings {
        upstream_timeout: Duration::from_secs(2),
        failure_grace: Duration::ZERO,
        crawl_enabled: true,
        max_concurrent_crawls: 16,
    }
}

pub fn build_engine(
    store: &Arc<MockRecordStore>,
    upstream: &MockUpstreamResolver,
    settings: ResolutionSettings,
) -> Arc<ResolveDomainUseCase> {
    Arc::new(ResolveDomainUseCase::new(
        Arc::clone(store) as Arc<dyn RecordStore>,
        Arc::new(upstream.clone()),
        settings,
    ))
}

/// Waits until every spawned background crawl has finished.
pub async fn wait_for_crawls(engine: &ResolveDomainUseCase) {
    let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
    while engine.crawls_pending() > 0 {
        assert!(
            tokio::time::Instant::now() < deadline,
            "background crawls did not settle"
        );
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
}
