use crate::{dto::CacheStatsResponse, state::AppState};
use axum::{extract::State, Json};
use tracing::{debug, instrument};

#[instrument(skip(state), name = "api_get_cache_stats")]
pub async fn get_cache_stats(State(state): State<AppState>) -> Json<CacheStatsResponse> {
    let stats = state.get_cache_stats.execute();

    debug!(
        domains = stats.domains,
        hits = stats.resolution.hits,
        misses = stats.resolution.misses,
        hit_rate = stats.hit_rate,
        "Cache statistics retrieved"
    );

    Json(CacheStatsResponse::from(stats))
}
