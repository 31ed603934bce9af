//! Recipe comment repository.

use std::sync::Arc;

use crate::entities::{RecipeComment, recipe_comment};
use letcook_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
};

/// Recipe comment repository for database operations.
#[derive(Clone)]
pub struct RecipeCommentRepository {
    db: Arc<DatabaseConnection>,
}

impl RecipeCommentRepository {
    /// Create a new recipe comment repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Create a new comment.
    pub async fn create(
        &self,
        model: recipe_comment::ActiveModel,
    ) -> AppResult<recipe_comment::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Comments on a recipe, newest first.
    pub async fn find_by_recipe(&self, recipe_id: &str) -> AppResult<Vec<recipe_comment::Model>> {
        RecipeComment::find()
            .filter(recipe_comment::Column::RecipeId.eq(recipe_id))
            .order_by_desc(recipe_comment::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
