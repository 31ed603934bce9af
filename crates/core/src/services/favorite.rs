//! Favorite recipes service.

use std::collections::HashMap;

use letcook_common::{AppError, AppResult, IdGenerator};
use letcook_db::{
    entities::{favorite, user},
    repositories::{FavoriteRepository, RecipeRepository},
};
use sea_orm::Set;
use serde::Serialize;

use super::recipe::{RecipeDetails, RecipeService};

/// Whether the caller has saved a recipe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FavoriteStatus {
    pub favorited: bool,
}

/// Favorite service.
#[derive(Clone)]
pub struct FavoriteService {
    favorite_repo: FavoriteRepository,
    recipe_repo: RecipeRepository,
    recipe_service: RecipeService,
    id_gen: IdGenerator,
}

impl FavoriteService {
    /// Create a new favorite service.
    #[must_use]
    pub const fn new(
        favorite_repo: FavoriteRepository,
        recipe_repo: RecipeRepository,
        recipe_service: RecipeService,
    ) -> Self {
        Self {
            favorite_repo,
            recipe_repo,
            recipe_service,
            id_gen: IdGenerator::new(),
        }
    }

    /// Save a recipe to the user's favorites.
    pub async fn add(&self, user: &user::Model, recipe_id: &str) -> AppResult<FavoriteStatus> {
        self.recipe_service.load(recipe_id).await?;

        if self
            .favorite_repo
            .find_by_pair(&user.id, recipe_id)
            .await?
            .is_some()
        {
            return Err(AppError::Conflict("Recipe already in favorites".to_string()));
        }

        let model = favorite::ActiveModel {
            id: Set(self.id_gen.generate()),
            user_id: Set(user.id.clone()),
            recipe_id: Set(recipe_id.to_string()),
            created_at: Set(chrono::Utc::now().into()),
        };
        self.favorite_repo.create(model).await?;

        Ok(FavoriteStatus { favorited: true })
    }

    /// Remove a recipe from the user's favorites.
    pub async fn remove(&self, user: &user::Model, recipe_id: &str) -> AppResult<FavoriteStatus> {
        let favorite = self
            .favorite_repo
            .find_by_pair(&user.id, recipe_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Favorite for recipe {recipe_id}")))?;

        self.favorite_repo.delete(favorite).await?;
        Ok(FavoriteStatus { favorited: false })
    }

    pub async fn status(&self, user: &user::Model, recipe_id: &str) -> AppResult<FavoriteStatus> {
        let favorited = self
            .favorite_repo
            .find_by_pair(&user.id, recipe_id)
            .await?
            .is_some();
        Ok(FavoriteStatus { favorited })
    }

    /// A user's favorite recipes, most recently saved first.
    ///
    /// Favorites whose recipe no longer exists are skipped.
    pub async fn favorites_of(&self, user_id: &str) -> AppResult<Vec<RecipeDetails>> {
        let favorites = self.favorite_repo.find_by_user(user_id).await?;
        let ids: Vec<String> = favorites.iter().map(|f| f.recipe_id.clone()).collect();

        let mut recipes: HashMap<String, _> = self
            .recipe_repo
            .find_by_ids(&ids)
            .await?
            .into_iter()
            .map(|r| (r.id.clone(), r))
            .collect();

        let ordered = ids.iter().filter_map(|id| recipes.remove(id)).collect();
        self.recipe_service.details(ordered).await
    }
}
