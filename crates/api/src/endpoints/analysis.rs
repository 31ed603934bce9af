//! LLM analysis endpoints.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post},
};
use letcook_common::AppResult;
use letcook_core::{NutritionFacts, NutritionInput, RecipeAnalysis};

use crate::{extractors::MaybeAuthUser, middleware::AppState, response::ApiResponse};

async fn nutrition(
    State(state): State<AppState>,
    Json(input): Json<NutritionInput>,
) -> AppResult<ApiResponse<NutritionFacts>> {
    let facts = state.analysis_service.nutrition(input).await?;
    Ok(ApiResponse::ok(facts))
}

async fn recipe_analysis(
    MaybeAuthUser(viewer): MaybeAuthUser,
    State(state): State<AppState>,
    Path(recipe_id): Path<String>,
) -> AppResult<ApiResponse<RecipeAnalysis>> {
    let analysis = state
        .analysis_service
        .analyze_recipe(viewer.as_ref(), &recipe_id)
        .await?;
    Ok(ApiResponse::ok(analysis))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/analysis/nutrition", post(nutrition))
        .route("/recipe/{id}/analysis", get(recipe_analysis))
}
