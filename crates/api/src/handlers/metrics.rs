use crate::{exposition, state::AppState};
use axum::{extract::State, http::header, response::IntoResponse};
use tracing::instrument;

#[instrument(skip(state), name = "api_get_metrics")]
pub async fn get_metrics(State(state): State<AppState>) -> impl IntoResponse {
    let stats = state.get_cache_stats.execute();
    (
        [(header::CONTENT_TYPE, exposition::CONTENT_TYPE)],
        exposition::render(&stats),
    )
}
