//! Database entities.

#![allow(missing_docs)]

pub mod favorite;
pub mod following;
pub mod notification;
pub mod recipe;
pub mod recipe_comment;
pub mod recipe_ingredient;
pub mod recipe_reaction;
pub mod recipe_report;
pub mod recipe_step;
pub mod recipe_tag;
pub mod user;

pub use favorite::Entity as Favorite;
pub use following::Entity as Following;
pub use notification::Entity as Notification;
pub use recipe::Entity as Recipe;
pub use recipe_comment::Entity as RecipeComment;
pub use recipe_ingredient::Entity as RecipeIngredient;
pub use recipe_reaction::Entity as RecipeReaction;
pub use recipe_report::Entity as RecipeReport;
pub use recipe_step::Entity as RecipeStep;
pub use recipe_tag::Entity as RecipeTag;
pub use user::Entity as User;
