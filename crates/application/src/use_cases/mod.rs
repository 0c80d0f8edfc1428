pub mod cache;
pub mod dns;

pub use cache::{CacheStats, GetCacheStatsUseCase};
pub use dns::{
    DomainRecords, HandleDnsQueryUseCase, ResolutionSettings, ResolutionStats,
    ResolutionStatsSnapshot, ResolveDomainUseCase,
};
