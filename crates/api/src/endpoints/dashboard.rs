//! Admin dashboard endpoints.

use axum::{Router, extract::State, routing::get};
use letcook_common::AppResult;
use letcook_core::{DashboardStats, MonthlyRecipes};

use crate::{extractors::AdminUser, middleware::AppState, response::ApiResponse};

async fn stats(
    AdminUser(_admin): AdminUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<DashboardStats>> {
    let stats = state.dashboard_service.stats().await?;
    Ok(ApiResponse::ok(stats))
}

async fn recipes_by_month(
    AdminUser(_admin): AdminUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Vec<MonthlyRecipes>>> {
    let months = state
        .dashboard_service
        .recipes_by_month(chrono::Utc::now())
        .await?;
    Ok(ApiResponse::ok(months))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/stats", get(stats))
        .route("/recipes-by-month", get(recipes_by_month))
}
