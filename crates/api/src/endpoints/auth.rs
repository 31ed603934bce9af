//! Authentication endpoints.

use axum::{Json, Router, extract::State, routing::post};
use letcook_common::AppResult;
use letcook_core::AuthenticateInput;
use letcook_db::entities::user;
use serde::Serialize;

use crate::{middleware::AppState, response::ApiResponse};

/// Token issued after the identity provider vouched for a user.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticateResponse {
    pub access_token: String,
    pub user: user::Model,
}

/// Exchange an identity-provider result for an access token.
async fn authenticate(
    State(state): State<AppState>,
    Json(input): Json<AuthenticateInput>,
) -> AppResult<ApiResponse<AuthenticateResponse>> {
    let user = state.user_service.authenticate(input).await?;
    let access_token = state.token_service.issue(&user)?;

    tracing::info!(user_id = %user.id, "User authenticated");
    Ok(ApiResponse::ok(AuthenticateResponse { access_token, user }))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/authenticate", post(authenticate))
}
