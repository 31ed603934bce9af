//! Recipe reaction service.

use letcook_common::{AppResult, IdGenerator};
use letcook_db::{
    entities::{recipe_reaction, user},
    repositories::RecipeReactionRepository,
};
use sea_orm::{IntoActiveModel, Set};
use serde::{Deserialize, Serialize};

use super::recipe::RecipeService;

/// Reaction flags to set. Absent flags are left as they are.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReactionInput {
    pub is_like: Option<bool>,
    pub is_heart: Option<bool>,
    pub is_cookpot: Option<bool>,
}

/// A viewer's flags on a recipe plus the recipe's totals.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReactionSummary {
    pub is_like: bool,
    pub is_heart: bool,
    pub is_cookpot: bool,
    pub like_count: u64,
    pub heart_count: u64,
    pub cookpot_count: u64,
}

/// Reaction service.
#[derive(Clone)]
pub struct ReactionService {
    reaction_repo: RecipeReactionRepository,
    recipe_service: RecipeService,
    id_gen: IdGenerator,
}

impl ReactionService {
    /// Create a new reaction service.
    #[must_use]
    pub const fn new(reaction_repo: RecipeReactionRepository, recipe_service: RecipeService) -> Self {
        Self {
            reaction_repo,
            recipe_service,
            id_gen: IdGenerator::new(),
        }
    }

    /// Upsert the user's reaction flags on a recipe.
    pub async fn react(
        &self,
        user: &user::Model,
        recipe_id: &str,
        input: ReactionInput,
    ) -> AppResult<ReactionSummary> {
        self.recipe_service.load(recipe_id).await?;

        match self.reaction_repo.find_by_pair(recipe_id, &user.id).await? {
            Some(existing) => {
                let mut active = existing.into_active_model();
                if let Some(v) = input.is_like {
                    active.is_like = Set(v);
                }
                if let Some(v) = input.is_heart {
                    active.is_heart = Set(v);
                }
                if let Some(v) = input.is_cookpot {
                    active.is_cookpot = Set(v);
                }
                active.updated_at = Set(Some(chrono::Utc::now().into()));
                self.reaction_repo.update(active).await?;
            }
            None => {
                let model = recipe_reaction::ActiveModel {
                    id: Set(self.id_gen.generate()),
                    recipe_id: Set(recipe_id.to_string()),
                    user_id: Set(user.id.clone()),
                    is_like: Set(input.is_like.unwrap_or(false)),
                    is_heart: Set(input.is_heart.unwrap_or(false)),
                    is_cookpot: Set(input.is_cookpot.unwrap_or(false)),
                    created_at: Set(chrono::Utc::now().into()),
                    updated_at: Set(None),
                };
                self.reaction_repo.create(model).await?;
            }
        }

        self.summary(recipe_id, Some(&user.id)).await
    }

    /// Totals for a recipe, plus `user_id`'s own flags when given.
    pub async fn summary(&self, recipe_id: &str, user_id: Option<&str>) -> AppResult<ReactionSummary> {
        let own = match user_id {
            Some(user_id) => self.reaction_repo.find_by_pair(recipe_id, user_id).await?,
            None => None,
        };
        let counts = self.reaction_repo.count_by_recipe(recipe_id).await?;

        Ok(ReactionSummary {
            is_like: own.as_ref().is_some_and(|r| r.is_like),
            is_heart: own.as_ref().is_some_and(|r| r.is_heart),
            is_cookpot: own.as_ref().is_some_and(|r| r.is_cookpot),
            like_count: counts.likes,
            heart_count: counts.hearts,
            cookpot_count: counts.cookpots,
        })
    }
}
