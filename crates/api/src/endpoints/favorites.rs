//! Favorite recipe endpoints.

use axum::{
    Router,
    extract::{Path, State},
    routing::{get, post},
};
use letcook_common::AppResult;
use letcook_core::{FavoriteStatus, RecipeDetails};

use crate::{extractors::AuthUser, middleware::AppState, response::ApiResponse};

async fn add(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(recipe_id): Path<String>,
) -> AppResult<ApiResponse<FavoriteStatus>> {
    let status = state.favorite_service.add(&user, &recipe_id).await?;
    Ok(ApiResponse::ok(status))
}

async fn remove(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(recipe_id): Path<String>,
) -> AppResult<ApiResponse<FavoriteStatus>> {
    let status = state.favorite_service.remove(&user, &recipe_id).await?;
    Ok(ApiResponse::ok(status))
}

async fn status(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(recipe_id): Path<String>,
) -> AppResult<ApiResponse<FavoriteStatus>> {
    let status = state.favorite_service.status(&user, &recipe_id).await?;
    Ok(ApiResponse::ok(status))
}

async fn favorites_of(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> AppResult<ApiResponse<Vec<RecipeDetails>>> {
    let recipes = state.favorite_service.favorites_of(&user_id).await?;
    Ok(ApiResponse::ok(recipes))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/favorite/{id}", post(add).delete(remove))
        .route("/favorite/{id}/status", get(status))
        .route("/recipe/favorite/{id}", get(favorites_of))
}
