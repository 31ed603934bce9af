//! Recipe reaction repository.

use std::sync::Arc;

use crate::entities::{RecipeReaction, recipe_reaction};
use letcook_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
};

/// Totals of each reaction flag on one recipe.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReactionCounts {
    /// Users who liked the recipe.
    pub likes: u64,
    /// Users who hearted the recipe.
    pub hearts: u64,
    /// Users who cooked the recipe.
    pub cookpots: u64,
}

/// Recipe reaction repository for database operations.
#[derive(Clone)]
pub struct RecipeReactionRepository {
    db: Arc<DatabaseConnection>,
}

impl RecipeReactionRepository {
    /// Create a new recipe reaction repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find the reaction row of a user on a recipe.
    pub async fn find_by_pair(
        &self,
        recipe_id: &str,
        user_id: &str,
    ) -> AppResult<Option<recipe_reaction::Model>> {
        RecipeReaction::find()
            .filter(recipe_reaction::Column::RecipeId.eq(recipe_id))
            .filter(recipe_reaction::Column::UserId.eq(user_id))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new reaction row.
    pub async fn create(
        &self,
        model: recipe_reaction::ActiveModel,
    ) -> AppResult<recipe_reaction::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update a reaction row.
    pub async fn update(
        &self,
        model: recipe_reaction::ActiveModel,
    ) -> AppResult<recipe_reaction::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    async fn count_flag(&self, recipe_id: &str, flag: recipe_reaction::Column) -> AppResult<u64> {
        RecipeReaction::find()
            .filter(recipe_reaction::Column::RecipeId.eq(recipe_id))
            .filter(flag.eq(true))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count how many users set each flag on a recipe.
    pub async fn count_by_recipe(&self, recipe_id: &str) -> AppResult<ReactionCounts> {
        Ok(ReactionCounts {
            likes: self
                .count_flag(recipe_id, recipe_reaction::Column::IsLike)
                .await?,
            hearts: self
                .count_flag(recipe_id, recipe_reaction::Column::IsHeart)
                .await?,
            cookpots: self
                .count_flag(recipe_id, recipe_reaction::Column::IsCookpot)
                .await?,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn count_row(n: i64) -> std::collections::BTreeMap<&'static str, sea_orm::Value> {
        maplit::btreemap! { "num_items" => sea_orm::Value::BigInt(Some(n)) }
    }

    #[tokio::test]
    async fn test_count_by_recipe() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[count_row(4)], [count_row(2)], [count_row(0)]])
                .into_connection(),
        );

        let repo = RecipeReactionRepository::new(db);
        let counts = repo.count_by_recipe("r1").await.unwrap();

        assert_eq!(
            counts,
            ReactionCounts {
                likes: 4,
                hearts: 2,
                cookpots: 0,
            }
        );
    }

    #[tokio::test]
    async fn test_find_by_pair_none() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<recipe_reaction::Model>::new()])
                .into_connection(),
        );

        let repo = RecipeReactionRepository::new(db);
        assert!(repo.find_by_pair("r1", "user1").await.unwrap().is_none());
    }
}
