//! Recipe comment endpoints.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::post,
};
use letcook_common::AppResult;
use letcook_core::{CreateCommentInput, RecipeWithComments};

use crate::{extractors::AuthUser, middleware::AppState, response::ApiResponse};

async fn create(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(recipe_id): Path<String>,
    Json(input): Json<CreateCommentInput>,
) -> AppResult<ApiResponse<RecipeWithComments>> {
    let recipe = state
        .comment_service
        .create(&user, &recipe_id, input)
        .await?;
    Ok(ApiResponse::ok(recipe))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/recipe/{id}/comments", post(create))
}
