use mxcache_application::use_cases::GetCacheStatsUseCase;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub get_cache_stats: Arc<GetCacheStatsUseCase>,
}
