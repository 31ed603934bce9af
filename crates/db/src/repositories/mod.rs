//! Repository layer.
//!
//! One repository per aggregate; each wraps a shared connection and maps
//! database failures to [`letcook_common::AppError::Database`].

pub mod favorite;
pub mod following;
pub mod notification;
pub mod recipe;
pub mod recipe_comment;
pub mod recipe_reaction;
pub mod recipe_report;
pub mod recipe_tag;
pub mod user;

pub use favorite::FavoriteRepository;
pub use following::FollowingRepository;
pub use notification::NotificationRepository;
pub use recipe::RecipeRepository;
pub use recipe_comment::RecipeCommentRepository;
pub use recipe_reaction::{ReactionCounts, RecipeReactionRepository};
pub use recipe_report::{RecipeReportRepository, ReportCount};
pub use recipe_tag::RecipeTagRepository;
pub use user::UserRepository;
