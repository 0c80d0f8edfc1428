mod cache_stats_port;
mod record_store;
mod upstream_resolver;

pub use cache_stats_port::{CacheStatsPort, RecordMetricsSnapshot};
pub use record_store::{AddressSet, MailExchangeSet, PutOutcome, RecordStore};
pub use upstream_resolver::UpstreamResolver;
