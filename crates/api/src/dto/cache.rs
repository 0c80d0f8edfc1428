use mxcache_application::use_cases::CacheStats;
use serde::Serialize;

#[derive(Serialize, Debug, Clone)]
pub struct RecordCountsResponse {
    #[serde(rename = "A")]
    pub a: u64,
    #[serde(rename = "AAAA")]
    pub aaaa: u64,
    #[serde(rename = "MX")]
    pub mx: u64,
    pub total: u64,
}

#[derive(Serialize, Debug, Clone)]
pub struct CrawlStatsResponse {
    pub running: usize,
    pub pending: usize,
    pub visited: usize,
    pub scheduled: u64,
    pub skipped: u64,
    pub cancelled: u64,
}

#[derive(Serialize, Debug, Clone)]
pub struct CacheStatsResponse {
    pub domains: usize,
    pub records: RecordCountsResponse,
    pub hits: u64,
    pub misses: u64,
    pub coalesced: u64,
    pub upstream_failures: u64,
    pub suppressed: u64,
    pub hit_rate: f64,
    pub crawl: CrawlStatsResponse,
}

impl From<CacheStats> for CacheStatsResponse {
    fn from(stats: CacheStats) -> Self {
        Self {
            domains: stats.domains,
            records: RecordCountsResponse {
                a: stats.records.a_records,
                aaaa: stats.records.aaaa_records,
                mx: stats.records.mx_records,
                total: stats.records.total_records(),
            },
            hits: stats.resolution.hits,
            misses: stats.resolution.misses,
            coalesced: stats.resolution.coalesced,
            upstream_failures: stats.resolution.upstream_failures,
            suppressed: stats.resolution.suppressed,
            hit_rate: stats.hit_rate,
            crawl: CrawlStatsResponse {
                running: stats.crawls_running,
                pending: stats.crawls_pending,
                visited: stats.crawled_hosts,
                scheduled: stats.resolution.crawls_scheduled,
                skipped: stats.resolution.crawls_skipped,
                cancelled: stats.resolution.crawls_cancelled,
            },
        }
    }
}
