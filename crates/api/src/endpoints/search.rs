//! Recipe search endpoint.

use axum::{Router, extract::State, routing::get};
use axum_extra::extract::Query;
use letcook_common::AppResult;
use letcook_core::{SearchQuery, SearchResult};

use crate::{middleware::AppState, response::ApiResponse};

/// `searchWords` and `ingredients` may be repeated in the query string.
async fn search(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> AppResult<ApiResponse<SearchResult>> {
    let result = state.search_service.search(query).await?;
    Ok(ApiResponse::ok(result))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/recipe/search", get(search))
}
