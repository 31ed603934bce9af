//! Nutrition target endpoint.

use axum::{Json, Router, routing::post};
use letcook_common::AppResult;
use letcook_core::{NutritionTargets, TargetsInput, calculate_targets};

use crate::{middleware::AppState, response::ApiResponse};

async fn targets(Json(input): Json<TargetsInput>) -> AppResult<ApiResponse<NutritionTargets>> {
    Ok(ApiResponse::ok(calculate_targets(&input)?))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/targets", post(targets))
}
