//! Recipe tag repository.

use std::sync::Arc;

use crate::entities::{RecipeTag, recipe_tag};
use letcook_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect,
};

/// Recipe tag repository for database operations.
#[derive(Clone)]
pub struct RecipeTagRepository {
    db: Arc<DatabaseConnection>,
}

impl RecipeTagRepository {
    /// Create a new recipe tag repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a tag by its exact name.
    pub async fn find_by_name(&self, name: &str) -> AppResult<Option<recipe_tag::Model>> {
        RecipeTag::find()
            .filter(recipe_tag::Column::Name.eq(name))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// All tag names, alphabetically.
    pub async fn find_names(&self) -> AppResult<Vec<String>> {
        RecipeTag::find()
            .select_only()
            .column(recipe_tag::Column::Name)
            .order_by_asc(recipe_tag::Column::Name)
            .into_tuple::<String>()
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new tag.
    pub async fn create(&self, model: recipe_tag::ActiveModel) -> AppResult<recipe_tag::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
