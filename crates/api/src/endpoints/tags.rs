//! Recipe tag endpoints.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post},
};
use letcook_common::AppResult;
use letcook_core::{CreateTagInput, RecipeDetails, SetTagsInput};
use letcook_db::entities::recipe_tag;

use crate::{extractors::AuthUser, middleware::AppState, response::ApiResponse};

async fn list(State(state): State<AppState>) -> AppResult<ApiResponse<Vec<String>>> {
    let names = state.tag_service.list().await?;
    Ok(ApiResponse::ok(names))
}

async fn create(
    AuthUser(_user): AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateTagInput>,
) -> AppResult<ApiResponse<recipe_tag::Model>> {
    let tag = state.tag_service.create(input).await?;
    Ok(ApiResponse::created(tag))
}

async fn set_recipe_tags(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(recipe_id): Path<String>,
    Json(input): Json<SetTagsInput>,
) -> AppResult<ApiResponse<RecipeDetails>> {
    let recipe = state
        .tag_service
        .set_recipe_tags(&user, &recipe_id, input)
        .await?;
    Ok(ApiResponse::ok(recipe))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/recipe/tag", get(list).post(create))
        .route("/recipe/tag/{id}", post(set_recipe_tags))
}
