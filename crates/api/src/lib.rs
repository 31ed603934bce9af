//! HTTP API layer for letcook.
//!
//! - **Endpoints**: the REST surface mounted under `/api`
//! - **Extractors**: authenticated and admin users
//! - **Middleware**: bearer token authentication and shared state
//!
//! Built on Axum 0.8 with Tower middleware stack.

pub mod endpoints;
pub mod extractors;
pub mod middleware;
pub mod response;

pub use endpoints::router;
pub use middleware::{AppState, auth_middleware};
