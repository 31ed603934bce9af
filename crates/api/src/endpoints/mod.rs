//! API endpoints.

mod analysis;
mod auth;
mod comments;
mod dashboard;
mod favorites;
mod notifications;
mod nutrition;
mod reactions;
mod recipes;
mod reports;
mod search;
mod tags;
mod users;

use axum::Router;

use crate::middleware::AppState;

/// Create the API router.
///
/// Recipe sub-resources are merged rather than nested because they share the
/// `/recipe` prefix.
pub fn router() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .merge(users::router())
        .merge(recipes::router())
        .merge(tags::router())
        .merge(comments::router())
        .merge(reactions::router())
        .merge(reports::router())
        .merge(favorites::router())
        .merge(search::router())
        .merge(analysis::router())
        .nest("/nutrition", nutrition::router())
        .nest("/notifications", notifications::router())
        .nest("/dashboard", dashboard::router())
}
