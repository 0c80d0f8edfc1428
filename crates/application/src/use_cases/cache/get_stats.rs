use crate::ports::{CacheStatsPort, RecordMetricsSnapshot};
use crate::use_cases::dns::{ResolutionStatsSnapshot, ResolveDomainUseCase};
use serde::Serialize;
use std::sync::Arc;

#[derive(Debug, Clone, Serialize)]
pub struct CacheStats {
    pub domains: usize,
    pub records: RecordMetricsSnapshot,
    pub resolution: ResolutionStatsSnapshot,
    pub hit_rate: f64,
    pub crawls_running: usize,
    pub crawls_pending: usize,
    pub crawled_hosts: usize,
}

pub struct GetCacheStatsUseCase {
    cache: Arc<dyn CacheStatsPort>,
    engine: Arc<ResolveDomainUseCase>,
}

impl GetCacheStatsUseCase {
    pub fn new(cache: Arc<dyn CacheStatsPort>, engine: Arc<ResolveDomainUseCase>) -> Self {
        Self { cache, engine }
    }

    pub fn execute(&self) -> CacheStats {
        let resolution = self.engine.stats();
        CacheStats {
            domains: self.cache.domain_count(),
            records: self.cache.metrics_snapshot(),
            hit_rate: resolution.hit_rate(),
            resolution,
            crawls_running: self.engine.crawls_running(),
            crawls_pending: self.engine.crawls_pending(),
            crawled_hosts: self.engine.crawled_hosts(),
        }
    }
}
