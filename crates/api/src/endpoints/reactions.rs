//! Recipe reaction endpoints.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::get,
};
use letcook_common::AppResult;
use letcook_core::{ReactionInput, ReactionSummary};
use serde::Deserialize;

use crate::{
    extractors::{AuthUser, MaybeAuthUser},
    middleware::AppState,
    response::ApiResponse,
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryQuery {
    /// Whose flags to report; defaults to the caller.
    pub user_id: Option<String>,
}

async fn react(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(recipe_id): Path<String>,
    Json(input): Json<ReactionInput>,
) -> AppResult<ApiResponse<ReactionSummary>> {
    let summary = state
        .reaction_service
        .react(&user, &recipe_id, input)
        .await?;
    Ok(ApiResponse::ok(summary))
}

async fn summary(
    MaybeAuthUser(viewer): MaybeAuthUser,
    State(state): State<AppState>,
    Path(recipe_id): Path<String>,
    Query(query): Query<SummaryQuery>,
) -> AppResult<ApiResponse<ReactionSummary>> {
    let user_id = query.user_id.or_else(|| viewer.map(|v| v.id));
    let summary = state
        .reaction_service
        .summary(&recipe_id, user_id.as_deref())
        .await?;
    Ok(ApiResponse::ok(summary))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/recipe/{id}/reactions", get(summary).post(react))
}
