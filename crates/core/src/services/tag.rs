//! Recipe tag service.

use letcook_common::{AppError, AppResult, IdGenerator};
use letcook_db::{
    entities::{recipe_tag, user},
    repositories::{RecipeRepository, RecipeTagRepository},
};
use sea_orm::{IntoActiveModel, Set};
use serde::Deserialize;
use validator::Validate;

use super::recipe::{RecipeDetails, RecipeService, dedup_names};

/// Input for creating a tag.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateTagInput {
    #[validate(length(min = 1, max = 64))]
    pub name: String,
}

/// Input for replacing a recipe's tags.
#[derive(Debug, Clone, Deserialize)]
pub struct SetTagsInput {
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Tag service for the shared tag vocabulary.
#[derive(Clone)]
pub struct TagService {
    tag_repo: RecipeTagRepository,
    recipe_repo: RecipeRepository,
    recipe_service: RecipeService,
    id_gen: IdGenerator,
}

impl TagService {
    /// Create a new tag service.
    #[must_use]
    pub const fn new(
        tag_repo: RecipeTagRepository,
        recipe_repo: RecipeRepository,
        recipe_service: RecipeService,
    ) -> Self {
        Self {
            tag_repo,
            recipe_repo,
            recipe_service,
            id_gen: IdGenerator::new(),
        }
    }

    /// All tag names, alphabetically.
    pub async fn list(&self) -> AppResult<Vec<String>> {
        self.tag_repo.find_names().await
    }

    /// Create a tag unless one with the same name exists.
    pub async fn create(&self, input: CreateTagInput) -> AppResult<recipe_tag::Model> {
        let input = CreateTagInput {
            name: input.name.trim().to_string(),
        };
        input.validate()?;
        self.ensure(&input.name).await
    }

    async fn ensure(&self, name: &str) -> AppResult<recipe_tag::Model> {
        if let Some(tag) = self.tag_repo.find_by_name(name).await? {
            return Ok(tag);
        }

        let model = recipe_tag::ActiveModel {
            id: Set(self.id_gen.generate()),
            name: Set(name.to_string()),
            created_at: Set(chrono::Utc::now().into()),
        };

        match self.tag_repo.create(model).await {
            Ok(tag) => Ok(tag),
            // Lost a race against a concurrent insert of the same name.
            Err(e) => self.tag_repo.find_by_name(name).await?.ok_or(e),
        }
    }

    /// Replace a recipe's tags, registering unknown names on the way.
    pub async fn set_recipe_tags(
        &self,
        actor: &user::Model,
        recipe_id: &str,
        input: SetTagsInput,
    ) -> AppResult<RecipeDetails> {
        let names = dedup_names(&input.tags);
        if let Some(long) = names.iter().find(|n| n.chars().count() > 64) {
            return Err(AppError::Validation(format!("Tag too long: {long}")));
        }

        let recipe = self.recipe_service.load_editable(actor, recipe_id).await?;

        for name in &names {
            self.ensure(name).await?;
        }

        let mut active = recipe.into_active_model();
        active.tags = Set(serde_json::json!(names));
        active.updated_at = Set(Some(chrono::Utc::now().into()));
        let recipe = self.recipe_repo.update(active).await?;

        tracing::debug!(recipe_id, count = names.len(), "Recipe tags replaced");
        self.recipe_service.detail(recipe).await
    }
}
