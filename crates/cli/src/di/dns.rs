use mxcache_application::ports::{CacheStatsPort, RecordStore};
use mxcache_application::use_cases::{
    GetCacheStatsUseCase, HandleDnsQueryUseCase, ResolutionSettings, ResolveDomainUseCase,
};
use mxcache_domain::Config;
use mxcache_infrastructure::dns::{DnsServerHandler, ForwardingUpstreamResolver, InMemoryRecordStore};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::info;

pub struct DnsServices {
    pub handler: DnsServerHandler,
    pub get_cache_stats: Arc<GetCacheStatsUseCase>,
}

impl DnsServices {
    pub fn new(config: &Config, shutdown: CancellationToken) -> anyhow::Result<Self> {
        info!("Initializing DNS services");

        let store = Arc::new(InMemoryRecordStore::new());
        let upstream = Arc::new(ForwardingUpstreamResolver::from_config(&config.upstream)?);

        info!(
            servers = ?upstream.servers(),
            timeout_ms = config.upstream.query_timeout_ms,
            "Upstream resolver configured"
        );

        let settings = ResolutionSettings::from_config(config);
        info!(
            crawl_enabled = settings.crawl_enabled,
            max_concurrent_crawls = settings.max_concurrent_crawls,
            failure_grace_ms = config.cache.failure_grace_ms,
            answer_ttl = config.cache.answer_ttl,
            "Resolution engine configured"
        );

        let engine = Arc::new(
            ResolveDomainUseCase::new(store.clone() as Arc<dyn RecordStore>, upstream, settings)
                .with_shutdown(shutdown),
        );

        let query_use_case = Arc::new(HandleDnsQueryUseCase::new(
            engine.clone(),
            config.cache.answer_ttl,
        ));
        let get_cache_stats = Arc::new(GetCacheStatsUseCase::new(
            store as Arc<dyn CacheStatsPort>,
            engine,
        ));

        info!("DNS services initialized");

        Ok(Self {
            handler: DnsServerHandler::new(query_use_case),
            get_cache_stats,
        })
    }
}
