//! Recipe report and moderation endpoints.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post},
};
use letcook_common::AppResult;
use letcook_core::{CreateReportInput, RecipeDetails, ReportedRecipe};
use letcook_db::entities::recipe_report;

use crate::{
    extractors::{AdminUser, AuthUser},
    middleware::AppState,
    response::ApiResponse,
};

async fn report(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(recipe_id): Path<String>,
    Json(input): Json<CreateReportInput>,
) -> AppResult<ApiResponse<recipe_report::Model>> {
    let report = state
        .report_service
        .report(&user, &recipe_id, input)
        .await?;
    Ok(ApiResponse::created(report))
}

async fn reported(
    AdminUser(_admin): AdminUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Vec<ReportedRecipe>>> {
    let recipes = state.report_service.reported().await?;
    Ok(ApiResponse::ok(recipes))
}

async fn reports_for(
    AdminUser(_admin): AdminUser,
    State(state): State<AppState>,
    Path(recipe_id): Path<String>,
) -> AppResult<ApiResponse<Vec<recipe_report::Model>>> {
    let reports = state.report_service.reports_for(&recipe_id).await?;
    Ok(ApiResponse::ok(reports))
}

async fn block(
    AdminUser(admin): AdminUser,
    State(state): State<AppState>,
    Path(recipe_id): Path<String>,
) -> AppResult<ApiResponse<RecipeDetails>> {
    let recipe = state.report_service.block(&recipe_id).await?;
    tracing::info!(recipe_id = %recipe_id, admin_id = %admin.id, "Recipe blocked by admin");
    Ok(ApiResponse::ok(recipe))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/recipe/reports", get(reported))
        .route("/recipe/{id}/report", get(reports_for).post(report))
        .route("/recipe/{id}/block", post(block))
}
