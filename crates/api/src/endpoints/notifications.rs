//! Notifications endpoints.

use axum::{
    Router,
    extract::{Path, Query, State},
    routing::{get, post},
};
use letcook_common::AppResult;
use letcook_db::entities::notification;
use serde::{Deserialize, Serialize};

use crate::{extractors::AuthUser, middleware::AppState, response::ApiResponse};

#[derive(Debug, Deserialize)]
pub struct ListNotificationsQuery {
    /// Maximum results (default: 20, max: 100)
    pub limit: Option<u64>,
}

#[derive(Serialize)]
pub struct UnreadCountResponse {
    pub count: u64,
}

async fn list(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Query(query): Query<ListNotificationsQuery>,
) -> AppResult<ApiResponse<Vec<notification::Model>>> {
    let notifications = state
        .notification_service
        .list(&user.id, query.limit)
        .await?;
    Ok(ApiResponse::ok(notifications))
}

async fn mark_as_read(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<()>> {
    state
        .notification_service
        .mark_as_read(&user.id, &id)
        .await?;
    Ok(ApiResponse::ok(()))
}

async fn unread_count(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<UnreadCountResponse>> {
    let count = state.notification_service.unread_count(&user.id).await?;
    Ok(ApiResponse::ok(UnreadCountResponse { count }))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list))
        .route("/unread-count", get(unread_count))
        .route("/{id}/read", post(mark_as_read))
}
