use super::crawl::{CrawlGate, PendingCrawl};
use super::failure_grace::{FailureGrace, LookupKind};
use super::inflight::{wait_for_leader, InflightRole, InflightTable};
use super::stats::{ResolutionStats, ResolutionStatsSnapshot};
use crate::ports::{AddressSet, MailExchangeSet, RecordStore, UpstreamResolver};
use futures::future::BoxFuture;
use futures::FutureExt;
use mxcache_domain::{
    AddressRecord, Config, DomainError, DomainName, MailExchangeRecord, MailExchanger,
};
use std::future::Future;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

#[derive(Debug, Clone)]
pub struct ResolutionSettings {
    pub upstream_timeout: Duration,
    /// Zero disables failure memoization.
    pub failure_grace: Duration,
    pub crawl_enabled: bool,
    pub max_concurrent_crawls: usize,
}

impl Default for ResolutionSettings {
    fn default() -> Self {
        Self {
            upstream_timeout: Duration::from_millis(3000),
            failure_grace: Duration::from_millis(2000),
            crawl_enabled: true,
            max_concurrent_crawls: 64,
        }
    }
}

impl ResolutionSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            upstream_timeout: config.upstream.query_timeout(),
            failure_grace: config.cache.failure_grace(),
            crawl_enabled: config.cache.crawl_enabled,
            max_concurrent_crawls: config.cache.max_concurrent_crawls,
        }
    }
}

/// Everything known about one domain after a resolve.
#[derive(Debug, Clone)]
pub struct DomainRecords {
    pub domain: DomainName,
    pub addresses: AddressSet,
    pub mail_exchangers: MailExchangeSet,
}

impl DomainRecords {
    pub fn ipv4(&self) -> impl Iterator<Item = Ipv4Addr> + '_ {
        self.addresses.iter().filter_map(|record| match record.value {
            IpAddr::V4(ip) => Some(ip),
            IpAddr::V6(_) => None,
        })
    }

    pub fn ipv6(&self) -> impl Iterator<Item = Ipv6Addr> + '_ {
        self.addresses.iter().filter_map(|record| match record.value {
            IpAddr::V6(ip) => Some(ip),
            IpAddr::V4(_) => None,
        })
    }
}

/// Cache-first resolution of a domain's addresses and mail exchangers.
///
/// Misses are forwarded to the upstream with per-domain coalescing, so
/// concurrent first-time queries share one upstream call per record kind.
/// Freshly learned MX hosts are resolved in the background: each distinct
/// host gets one task, and a semaphore bounds how many run at once. Upstream failures never surface to
/// the caller: the affected list comes back empty and nothing is stored.
#[derive(Clone)]
pub struct ResolveDomainUseCase {
    store: Arc<dyn RecordStore>,
    upstream: Arc<dyn UpstreamResolver>,
    settings: ResolutionSettings,
    address_inflight: Arc<InflightTable<AddressSet>>,
    mx_inflight: Arc<InflightTable<MailExchangeSet>>,
    failures: Arc<FailureGrace>,
    crawler: Arc<CrawlGate>,
    stats: Arc<ResolutionStats>,
    shutdown: CancellationToken,
}

impl ResolveDomainUseCase {
    pub fn new(
        store: Arc<dyn RecordStore>,
        upstream: Arc<dyn UpstreamResolver>,
        settings: ResolutionSettings,
    ) -> Self {
        Self {
            store,
            upstream,
            address_inflight: Arc::new(InflightTable::new()),
            mx_inflight: Arc::new(InflightTable::new()),
            failures: Arc::new(FailureGrace::new(settings.failure_grace)),
            crawler: Arc::new(CrawlGate::new(settings.max_concurrent_crawls)),
            stats: Arc::new(ResolutionStats::default()),
            shutdown: CancellationToken::new(),
            settings,
        }
    }

    /// Ties background crawls to an externally owned shutdown signal.
    pub fn with_shutdown(mut self, token: CancellationToken) -> Self {
        self.shutdown = token;
        self
    }

    pub fn stats(&self) -> ResolutionStatsSnapshot {
        self.stats.snapshot()
    }

    pub fn crawls_running(&self) -> usize {
        self.crawler.running()
    }

    pub fn crawls_pending(&self) -> usize {
        self.crawler.pending()
    }

    pub fn crawled_hosts(&self) -> usize {
        self.crawler.visited_count()
    }

    pub async fn execute(&self, domain: &DomainName) -> DomainRecords {
        let (addresses, mail_exchangers) =
            tokio::join!(self.addresses(domain), self.mail_exchangers(domain));

        DomainRecords {
            domain: domain.clone(),
            addresses,
            mail_exchangers,
        }
    }

    async fn addresses(&self, domain: &DomainName) -> AddressSet {
        if let Some(cached) = self.store.get_addresses(domain) {
            ResolutionStats::bump(&self.stats.hits);
            debug!(domain = %domain, kind = "addresses", "Cache HIT");
            return cached;
        }

        ResolutionStats::bump(&self.stats.misses);
        if self.is_suppressed(domain, LookupKind::Addresses) {
            return empty_set();
        }

        let guard = match self.address_inflight.register_or_join(domain) {
            InflightRole::Leader(guard) => guard,
            InflightRole::Follower(rx) => {
                ResolutionStats::bump(&self.stats.coalesced);
                return wait_for_leader(rx)
                    .await
                    .or_else(|| self.store.get_addresses(domain))
                    .unwrap_or_else(empty_set);
            }
        };

        // A previous leader may have published between the read and the registration.
        if let Some(stored) = self.store.get_addresses(domain) {
            guard.publish(Arc::clone(&stored));
            return stored;
        }

        debug!(domain = %domain, kind = "addresses", "Cache MISS");
        let lookup = self.upstream.resolve_addresses(domain);
        match self.call_upstream(domain, LookupKind::Addresses, lookup).await {
            Ok(ips) => {
                let records = ips
                    .into_iter()
                    .map(|ip| AddressRecord::new(domain.clone(), ip))
                    .collect();
                let outcome = self.store.put_addresses_if_absent(domain, records);
                guard.publish(Arc::clone(&outcome.stored));
                outcome.stored
            }
            Err(_) => empty_set(),
        }
    }

    async fn mail_exchangers(&self, domain: &DomainName) -> MailExchangeSet {
        if let Some(cached) = self.store.get_mail_exchangers(domain) {
            ResolutionStats::bump(&self.stats.hits);
            debug!(domain = %domain, kind = "mail_exchangers", "Cache HIT");
            self.schedule_crawl(&cached);
            return cached;
        }

        ResolutionStats::bump(&self.stats.misses);
        if self.is_suppressed(domain, LookupKind::MailExchangers) {
            return empty_set();
        }

        let guard = match self.mx_inflight.register_or_join(domain) {
            InflightRole::Leader(guard) => guard,
            InflightRole::Follower(rx) => {
                ResolutionStats::bump(&self.stats.coalesced);
                return wait_for_leader(rx)
                    .await
                    .or_else(|| self.store.get_mail_exchangers(domain))
                    .unwrap_or_else(empty_set);
            }
        };

        if let Some(stored) = self.store.get_mail_exchangers(domain) {
            guard.publish(Arc::clone(&stored));
            return stored;
        }

        debug!(domain = %domain, kind = "mail_exchangers", "Cache MISS");
        let lookup = self.upstream.resolve_mail_exchangers(domain);
        match self
            .call_upstream(domain, LookupKind::MailExchangers, lookup)
            .await
        {
            Ok(exchangers) => {
                let records = mail_exchange_records(domain, exchangers);
                let outcome = self.store.put_mail_exchangers_if_absent(domain, records);
                guard.publish(Arc::clone(&outcome.stored));
                if outcome.inserted {
                    self.schedule_crawl(&outcome.stored);
                }
                outcome.stored
            }
            Err(_) => empty_set(),
        }
    }

    fn is_suppressed(&self, domain: &DomainName, kind: LookupKind) -> bool {
        if !self.failures.is_suppressed(domain, kind) {
            return false;
        }
        ResolutionStats::bump(&self.stats.suppressed);
        debug!(
            domain = %domain,
            kind = kind.as_str(),
            "Upstream failed recently, answering empty"
        );
        true
    }

    async fn call_upstream<T, F>(
        &self,
        domain: &DomainName,
        kind: LookupKind,
        lookup: F,
    ) -> Result<T, DomainError>
    where
        F: Future<Output = Result<T, DomainError>>,
    {
        let result = match tokio::time::timeout(self.settings.upstream_timeout, lookup).await {
            Ok(result) => result,
            Err(_) => Err(DomainError::QueryTimeout),
        };

        match &result {
            Ok(_) => self.failures.clear(domain, kind),
            Err(e) => {
                ResolutionStats::bump(&self.stats.upstream_failures);
                self.failures.record_failure(domain, kind);
                warn!(
                    domain = %domain,
                    kind = kind.as_str(),
                    error = %e,
                    "Upstream lookup failed"
                );
            }
        }

        result
    }

    fn schedule_crawl(&self, records: &[MailExchangeRecord]) {
        if !self.settings.crawl_enabled || self.shutdown.is_cancelled() {
            return;
        }

        for record in records {
            let host = &record.host;
            if *host == record.domain
                || self.store.is_fully_resolved(host)
                || !self.crawler.mark(host)
            {
                ResolutionStats::bump(&self.stats.crawls_skipped);
                continue;
            }

            ResolutionStats::bump(&self.stats.crawls_scheduled);
            debug!(
                host = %host,
                referrer = %record.domain,
                queued = self.crawler.pending(),
                limit = self.crawler.capacity(),
                "Scheduling MX host crawl"
            );
            let pending = CrawlGate::enqueue(&self.crawler);
            tokio::spawn(self.crawl(host.clone(), pending));
        }
    }

    fn crawl(&self, host: DomainName, pending: PendingCrawl) -> BoxFuture<'static, ()> {
        let engine = self.clone();
        async move {
            let _pending = pending;
            let permit = tokio::select! {
                _ = engine.shutdown.cancelled() => None,
                permit = engine.crawler.acquire() => permit,
            };
            let Some(_permit) = permit else {
                ResolutionStats::bump(&engine.stats.crawls_cancelled);
                engine.crawler.unmark(&host);
                return;
            };

            tokio::select! {
                _ = engine.shutdown.cancelled() => {
                    ResolutionStats::bump(&engine.stats.crawls_cancelled);
                    engine.crawler.unmark(&host);
                }
                _ = engine.execute(&host) => {
                    // Failed lookups leave a list unset; let a later MX hit retry.
                    if !engine.store.is_fully_resolved(&host) {
                        engine.crawler.unmark(&host);
                    }
                }
            }
        }
        .boxed()
    }
}

fn mail_exchange_records(
    domain: &DomainName,
    exchangers: Vec<MailExchanger>,
) -> Vec<MailExchangeRecord> {
    exchangers
        .into_iter()
        .filter_map(|mx| match DomainName::new(&mx.host) {
            Ok(host) => Some(MailExchangeRecord::new(domain.clone(), mx.preference, host)),
            Err(e) => {
                debug!(domain = %domain, host = %mx.host, error = %e, "Skipping unusable MX host");
                None
            }
        })
        .collect()
}

fn empty_set<T>() -> Arc<[T]> {
    Arc::from(Vec::new())
}
