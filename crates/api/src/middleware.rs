//! API middleware.

#![allow(missing_docs)]

use axum::{
    body::Body,
    extract::State,
    http::{Request, header::AUTHORIZATION},
    middleware::Next,
    response::{IntoResponse, Response},
};
use letcook_common::AppError;
use letcook_core::{
    AnalysisService, CommentService, DashboardService, FavoriteService, FollowingService,
    NotificationService, ReactionService, RecipeService, ReportService, SearchService,
    TagService, TokenService, UserService,
};

/// Application state.
#[derive(Clone)]
pub struct AppState {
    pub token_service: TokenService,
    pub user_service: UserService,
    pub following_service: FollowingService,
    pub recipe_service: RecipeService,
    pub tag_service: TagService,
    pub comment_service: CommentService,
    pub reaction_service: ReactionService,
    pub report_service: ReportService,
    pub favorite_service: FavoriteService,
    pub search_service: SearchService,
    pub analysis_service: AnalysisService,
    pub notification_service: NotificationService,
    pub dashboard_service: DashboardService,
}

/// Token from an `Authorization` header value. The scheme is case-insensitive.
fn bearer_token(header: &str) -> Option<&str> {
    let (scheme, token) = header.trim().split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

/// Authentication middleware.
///
/// Attaches the token's user to the request; requests without a usable token
/// continue anonymously and are rejected by the extractors that need a user.
/// A failed user lookup other than a missing user ends the request.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    if let Some(header) = req.headers().get(AUTHORIZATION)
        && let Ok(header) = header.to_str()
        && let Some(token) = bearer_token(header)
    {
        match state.token_service.verify(token) {
            Ok(claims) => match state.user_service.get(&claims.sub).await {
                Ok(user) => {
                    req.extensions_mut().insert(user);
                }
                Err(AppError::UserNotFound(_)) => {
                    tracing::debug!(user_id = %claims.sub, "Token user not found");
                }
                Err(e) => return e.into_response(),
            },
            Err(e) => tracing::debug!(error = %e, "Rejected bearer token"),
        }
    }

    next.run(req).await
}
