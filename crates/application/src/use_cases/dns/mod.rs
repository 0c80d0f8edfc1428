mod crawl;
mod failure_grace;
mod handle_dns_query;
mod inflight;
mod resolve_domain;
mod stats;

pub use handle_dns_query::HandleDnsQueryUseCase;
pub use resolve_domain::{DomainRecords, ResolutionSettings, ResolveDomainUseCase};
pub use stats::{ResolutionStats, ResolutionStatsSnapshot};
