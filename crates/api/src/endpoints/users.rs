//! User profile and follow endpoints.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};
use letcook_common::{AppError, AppResult};
use letcook_core::UpdateUserInput;
use letcook_db::entities::user;
use serde::Deserialize;

use crate::{
    extractors::{AdminUser, AuthUser},
    middleware::AppState,
    response::ApiResponse,
};

/// Follow / unfollow request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FollowRequest {
    pub followed_user_id: String,
}

async fn me(AuthUser(user): AuthUser) -> AppResult<ApiResponse<user::Model>> {
    Ok(ApiResponse::ok(user))
}

async fn update_me(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(input): Json<UpdateUserInput>,
) -> AppResult<ApiResponse<user::Model>> {
    let updated = state.user_service.update(&user, &user.id, input).await?;
    Ok(ApiResponse::ok(updated))
}

async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<user::Model>> {
    let user = state.user_service.get(&id).await?;
    Ok(ApiResponse::ok(user))
}

async fn update(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<UpdateUserInput>,
) -> AppResult<ApiResponse<user::Model>> {
    let updated = state.user_service.update(&user, &id, input).await?;
    Ok(ApiResponse::ok(updated))
}

async fn list(
    AdminUser(_admin): AdminUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Vec<user::Model>>> {
    let users = state.user_service.list_all().await?;
    Ok(ApiResponse::ok(users))
}

async fn following(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<Vec<user::Model>>> {
    let users = state.following_service.get_following(&id).await?;
    Ok(ApiResponse::ok(users))
}

async fn followers(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<Vec<user::Model>>> {
    let users = state.following_service.get_followers(&id).await?;
    Ok(ApiResponse::ok(users))
}

/// Only the follower themself or an admin may change a follow list.
fn ensure_self_or_admin(actor: &user::Model, id: &str) -> AppResult<()> {
    if actor.id == id || actor.is_admin() {
        Ok(())
    } else {
        Err(AppError::Forbidden(
            "Cannot change another user's follows".to_string(),
        ))
    }
}

async fn follow(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<FollowRequest>,
) -> AppResult<ApiResponse<Vec<user::Model>>> {
    ensure_self_or_admin(&user, &id)?;
    let users = state
        .following_service
        .follow(&id, &req.followed_user_id)
        .await?;
    Ok(ApiResponse::ok(users))
}

async fn unfollow(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<FollowRequest>,
) -> AppResult<ApiResponse<Vec<user::Model>>> {
    ensure_self_or_admin(&user, &id)?;
    let users = state
        .following_service
        .unfollow(&id, &req.followed_user_id)
        .await?;
    Ok(ApiResponse::ok(users))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/user", get(me).put(update_me))
        .route("/user/{id}", get(show).put(update))
        .route("/users", get(list))
        .route("/users/following/{id}", get(following).put(follow).delete(unfollow))
        .route("/users/followers/{id}", get(followers))
}
