//! Recipe service.

use std::collections::HashMap;

use letcook_common::{AppError, AppResult, IdGenerator, is_valid_id};
use letcook_db::{
    entities::{recipe, recipe_comment, recipe_ingredient, recipe_step, user},
    repositories::{RecipeCommentRepository, RecipeRepository, UserRepository},
};
use sea_orm::{IntoActiveModel, Set, prelude::DateTimeWithTimeZone};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::notification::NotificationService;

/// Default page size for recipe listings.
pub const DEFAULT_TAKE: u64 = 20;
/// Largest page size a caller may request.
pub const MAX_TAKE: u64 = 100;

/// One preparation step.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct StepInput {
    #[validate(length(min = 1, max = 5000))]
    pub description: String,

    #[serde(default)]
    pub images: Vec<String>,
}

/// One ingredient line.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct IngredientInput {
    #[validate(length(min = 1, max = 256))]
    pub name: String,

    #[serde(default)]
    #[validate(length(max = 64))]
    pub quantity: String,

    #[validate(length(max = 32))]
    pub unit: Option<String>,

    pub product_id: Option<i32>,
}

/// Recipe body used by both create and update.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RecipeInput {
    #[validate(length(min = 1, max = 256))]
    pub title: String,

    #[validate(length(max = 10000))]
    pub description: String,

    #[validate(range(min = 0))]
    pub cook_time: i32,

    #[validate(range(min = 1))]
    pub serving: i32,

    #[validate(length(max = 32))]
    pub difficulty: Option<String>,

    #[serde(default)]
    pub images: Vec<String>,

    #[validate(length(max = 1024))]
    pub video: Option<String>,

    /// Only honored on create; tags are managed through the tag service afterwards.
    #[serde(default)]
    pub tags: Vec<String>,

    #[serde(default)]
    #[validate(nested)]
    pub steps: Vec<StepInput>,

    #[serde(default)]
    #[validate(nested)]
    pub ingredients: Vec<IngredientInput>,
}

impl StepInput {
    fn trimmed(self) -> Self {
        Self {
            description: self.description.trim().to_string(),
            ..self
        }
    }
}

impl IngredientInput {
    /// Trim free-text fields so length checks see what gets stored.
    #[must_use]
    pub fn trimmed(self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            quantity: self.quantity.trim().to_string(),
            ..self
        }
    }
}

impl RecipeInput {
    /// Trim free-text fields so length checks see what gets stored.
    #[must_use]
    pub fn trimmed(self) -> Self {
        Self {
            title: self.title.trim().to_string(),
            steps: self.steps.into_iter().map(StepInput::trimmed).collect(),
            ingredients: self
                .ingredients
                .into_iter()
                .map(IngredientInput::trimmed)
                .collect(),
            ..self
        }
    }
}

/// Link between an ingredient row and a shop product.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductLink {
    /// Ingredient row ID.
    pub id: String,
    /// Product to link, or `None` to unlink.
    pub product_id: Option<i32>,
}

/// Paging and filter parameters of the public recipe listing.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListRecipesQuery {
    pub skip: Option<u64>,
    pub take: Option<u64>,
    /// Restrict to published recipes.
    pub is_public: Option<bool>,
}

/// Public face of a user attached to recipes and comments.
///
/// All fields are `None` when the user no longer exists.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AuthorSummary {
    pub id: Option<String>,
    pub name: Option<String>,
    pub avatar: Option<String>,
}

impl From<&user::Model> for AuthorSummary {
    fn from(user: &user::Model) -> Self {
        Self {
            id: Some(user.id.clone()),
            name: Some(user.username.clone()),
            avatar: user.avatar.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StepView {
    pub id: String,
    pub position: i32,
    pub description: String,
    pub images: Vec<String>,
}

impl From<recipe_step::Model> for StepView {
    fn from(step: recipe_step::Model) -> Self {
        Self {
            images: recipe::json_strings(&step.images),
            id: step.id,
            position: step.position,
            description: step.description,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IngredientView {
    pub id: String,
    pub position: i32,
    pub name: String,
    pub quantity: String,
    pub unit: Option<String>,
    pub product_id: Option<i32>,
}

impl From<recipe_ingredient::Model> for IngredientView {
    fn from(ingredient: recipe_ingredient::Model) -> Self {
        Self {
            id: ingredient.id,
            position: ingredient.position,
            name: ingredient.name,
            quantity: ingredient.quantity,
            unit: ingredient.unit,
            product_id: ingredient.product_id,
        }
    }
}

/// A recipe with its steps, ingredients and author.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeDetails {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub description: String,
    pub cook_time: i32,
    pub serving: i32,
    pub difficulty: Option<String>,
    pub images: Vec<String>,
    pub video: Option<String>,
    pub tags: Vec<String>,
    pub is_published: bool,
    pub is_activate: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: Option<DateTimeWithTimeZone>,
    pub steps: Vec<StepView>,
    pub ingredients: Vec<IngredientView>,
    pub author: AuthorSummary,
}

/// A comment with its author.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentView {
    pub id: String,
    pub content: String,
    pub created_at: DateTimeWithTimeZone,
    pub author: AuthorSummary,
}

/// Recipe details plus the comment thread, newest first.
#[derive(Debug, Clone, Serialize)]
pub struct RecipeWithComments {
    #[serde(flatten)]
    pub recipe: RecipeDetails,
    pub comments: Vec<CommentView>,
}

/// One page of the recipe listing.
#[derive(Debug, Clone, Serialize)]
pub struct RecipePage {
    pub recipes: Vec<RecipeDetails>,
    pub total: u64,
}

/// Whether `actor` may modify `recipe`.
fn can_edit(actor: &user::Model, recipe: &recipe::Model) -> bool {
    actor.is_admin() || actor.id == recipe.user_id
}

/// Trim, drop empties and de-duplicate while keeping first occurrences in order.
pub(crate) fn dedup_names(names: &[String]) -> Vec<String> {
    let mut seen = Vec::<String>::new();
    for name in names {
        let name = name.trim();
        if !name.is_empty() && !seen.iter().any(|s| s == name) {
            seen.push(name.to_string());
        }
    }
    seen
}

/// Recipe service for business logic.
#[derive(Clone)]
pub struct RecipeService {
    recipe_repo: RecipeRepository,
    user_repo: UserRepository,
    comment_repo: RecipeCommentRepository,
    notification_service: NotificationService,
    id_gen: IdGenerator,
}

impl RecipeService {
    /// Create a new recipe service.
    #[must_use]
    pub const fn new(
        recipe_repo: RecipeRepository,
        user_repo: UserRepository,
        comment_repo: RecipeCommentRepository,
        notification_service: NotificationService,
    ) -> Self {
        Self {
            recipe_repo,
            user_repo,
            comment_repo,
            notification_service,
            id_gen: IdGenerator::new(),
        }
    }

    /// Load a recipe row, rejecting malformed IDs before querying.
    pub async fn load(&self, id: &str) -> AppResult<recipe::Model> {
        if !is_valid_id(id) {
            return Err(AppError::BadRequest(format!("Invalid recipe id: {id}")));
        }
        self.recipe_repo.get_by_id(id).await
    }

    /// Load a recipe `actor` is allowed to modify.
    pub async fn load_editable(&self, actor: &user::Model, id: &str) -> AppResult<recipe::Model> {
        let recipe = self.load(id).await?;
        if !can_edit(actor, &recipe) {
            return Err(AppError::Forbidden(
                "Only the author or an admin can modify this recipe".to_string(),
            ));
        }
        Ok(recipe)
    }

    /// Author summaries keyed by user ID.
    pub async fn authors(&self, user_ids: &[String]) -> AppResult<HashMap<String, AuthorSummary>> {
        let mut ids = user_ids.to_vec();
        ids.sort();
        ids.dedup();

        let users = self.user_repo.find_by_ids(&ids).await?;
        Ok(users
            .iter()
            .map(|u| (u.id.clone(), AuthorSummary::from(u)))
            .collect())
    }

    /// Attach steps, ingredients and authors to recipes, keeping their order.
    pub async fn details(&self, recipes: Vec<recipe::Model>) -> AppResult<Vec<RecipeDetails>> {
        let ids: Vec<String> = recipes.iter().map(|r| r.id.clone()).collect();
        let user_ids: Vec<String> = recipes.iter().map(|r| r.user_id.clone()).collect();

        let mut steps: HashMap<String, Vec<StepView>> = HashMap::new();
        for step in self.recipe_repo.find_steps(&ids).await? {
            steps
                .entry(step.recipe_id.clone())
                .or_default()
                .push(step.into());
        }

        let mut ingredients: HashMap<String, Vec<IngredientView>> = HashMap::new();
        for ingredient in self.recipe_repo.find_ingredients(&ids).await? {
            ingredients
                .entry(ingredient.recipe_id.clone())
                .or_default()
                .push(ingredient.into());
        }

        let authors = self.authors(&user_ids).await?;

        Ok(recipes
            .into_iter()
            .map(|r| RecipeDetails {
                steps: steps.remove(&r.id).unwrap_or_default(),
                ingredients: ingredients.remove(&r.id).unwrap_or_default(),
                author: authors.get(&r.user_id).cloned().unwrap_or_default(),
                images: r.image_urls(),
                tags: r.tag_names(),
                id: r.id,
                user_id: r.user_id,
                title: r.title,
                description: r.description,
                cook_time: r.cook_time,
                serving: r.serving,
                difficulty: r.difficulty,
                video: r.video,
                is_published: r.is_published,
                is_activate: r.is_activate,
                created_at: r.created_at,
                updated_at: r.updated_at,
            })
            .collect())
    }

    /// Details of a single recipe.
    pub async fn detail(&self, recipe: recipe::Model) -> AppResult<RecipeDetails> {
        let id = recipe.id.clone();
        self.details(vec![recipe])
            .await?
            .pop()
            .ok_or(AppError::RecipeNotFound(id))
    }

    fn step_models(&self, recipe_id: &str, steps: &[StepInput]) -> Vec<recipe_step::ActiveModel> {
        steps
            .iter()
            .enumerate()
            .map(|(position, step)| recipe_step::ActiveModel {
                id: Set(self.id_gen.generate()),
                recipe_id: Set(recipe_id.to_string()),
                position: Set(i32::try_from(position).unwrap_or(i32::MAX)),
                description: Set(step.description.clone()),
                images: Set(serde_json::json!(step.images)),
            })
            .collect()
    }

    fn ingredient_models(
        &self,
        recipe_id: &str,
        ingredients: &[IngredientInput],
    ) -> Vec<recipe_ingredient::ActiveModel> {
        ingredients
            .iter()
            .enumerate()
            .map(|(position, ingredient)| recipe_ingredient::ActiveModel {
                id: Set(self.id_gen.generate()),
                recipe_id: Set(recipe_id.to_string()),
                position: Set(i32::try_from(position).unwrap_or(i32::MAX)),
                name: Set(ingredient.name.clone()),
                quantity: Set(ingredient.quantity.clone()),
                unit: Set(ingredient.unit.clone()),
                product_id: Set(ingredient.product_id),
            })
            .collect()
    }

    /// Create a recipe. New recipes wait for moderation: unpublished and inactive.
    pub async fn create(&self, author: &user::Model, input: RecipeInput) -> AppResult<RecipeDetails> {
        let input = input.trimmed();
        input.validate()?;

        let id = self.id_gen.generate();
        let model = recipe::ActiveModel {
            id: Set(id.clone()),
            user_id: Set(author.id.clone()),
            title: Set(input.title),
            description: Set(input.description),
            cook_time: Set(input.cook_time),
            serving: Set(input.serving),
            difficulty: Set(input.difficulty),
            images: Set(serde_json::json!(input.images)),
            video: Set(input.video),
            tags: Set(serde_json::json!(dedup_names(&input.tags))),
            is_published: Set(false),
            is_activate: Set(false),
            created_at: Set(chrono::Utc::now().into()),
            updated_at: Set(None),
        };

        let recipe = self.recipe_repo.create(model).await?;
        self.recipe_repo
            .replace_steps(&id, self.step_models(&id, &input.steps))
            .await?;
        self.recipe_repo
            .replace_ingredients(&id, self.ingredient_models(&id, &input.ingredients))
            .await?;

        tracing::info!(recipe_id = %id, user_id = %author.id, "Recipe created");
        self.detail(recipe).await
    }

    /// Replace a recipe's content, steps and ingredients.
    pub async fn update(
        &self,
        actor: &user::Model,
        id: &str,
        input: RecipeInput,
    ) -> AppResult<RecipeDetails> {
        let input = input.trimmed();
        input.validate()?;
        let recipe = self.load_editable(actor, id).await?;

        let mut active = recipe.into_active_model();
        active.title = Set(input.title);
        active.description = Set(input.description);
        active.cook_time = Set(input.cook_time);
        active.serving = Set(input.serving);
        active.difficulty = Set(input.difficulty);
        active.images = Set(serde_json::json!(input.images));
        active.video = Set(input.video);
        active.updated_at = Set(Some(chrono::Utc::now().into()));

        let recipe = self.recipe_repo.update(active).await?;
        self.recipe_repo
            .replace_steps(id, self.step_models(id, &input.steps))
            .await?;
        self.recipe_repo
            .replace_ingredients(id, self.ingredient_models(id, &input.ingredients))
            .await?;

        self.detail(recipe).await
    }

    /// Active recipes, oldest first.
    pub async fn list(&self, query: ListRecipesQuery) -> AppResult<RecipePage> {
        let published_only = query.is_public.unwrap_or(false);
        let take = query.take.unwrap_or(DEFAULT_TAKE).clamp(1, MAX_TAKE);
        let skip = query.skip.unwrap_or(0);

        let recipes = self
            .recipe_repo
            .find_active(published_only, skip, take)
            .await?;
        let total = self.recipe_repo.count_active(published_only).await?;

        Ok(RecipePage {
            recipes: self.details(recipes).await?,
            total,
        })
    }

    /// Every recipe regardless of moderation state.
    pub async fn list_all(&self) -> AppResult<Vec<RecipeDetails>> {
        let recipes = self.recipe_repo.find_all().await?;
        self.details(recipes).await
    }

    /// Details without comments. Inactive recipes are only visible to their
    /// author and admins.
    pub async fn get_details(
        &self,
        viewer: Option<&user::Model>,
        id: &str,
    ) -> AppResult<RecipeDetails> {
        let recipe = self.load(id).await?;
        if !recipe.is_activate && !viewer.is_some_and(|v| can_edit(v, &recipe)) {
            return Err(AppError::RecipeNotFound(id.to_string()));
        }
        self.detail(recipe).await
    }

    /// Details plus comments, newest first.
    pub async fn get(&self, viewer: Option<&user::Model>, id: &str) -> AppResult<RecipeWithComments> {
        let recipe = self.get_details(viewer, id).await?;
        let comments = self.comment_views(id).await?;
        Ok(RecipeWithComments { recipe, comments })
    }

    async fn comment_views(&self, recipe_id: &str) -> AppResult<Vec<CommentView>> {
        let comments = self.comment_repo.find_by_recipe(recipe_id).await?;
        let user_ids: Vec<String> = comments.iter().map(|c| c.user_id.clone()).collect();
        let authors = self.authors(&user_ids).await?;

        Ok(comments
            .into_iter()
            .map(|c: recipe_comment::Model| CommentView {
                author: authors.get(&c.user_id).cloned().unwrap_or_default(),
                id: c.id,
                content: c.content,
                created_at: c.created_at,
            })
            .collect())
    }

    /// Replace only the ingredient rows of a recipe.
    pub async fn update_ingredients(
        &self,
        actor: &user::Model,
        id: &str,
        ingredients: Vec<IngredientInput>,
    ) -> AppResult<RecipeDetails> {
        let ingredients: Vec<IngredientInput> =
            ingredients.into_iter().map(IngredientInput::trimmed).collect();
        for ingredient in &ingredients {
            ingredient.validate()?;
        }
        let recipe = self.load_editable(actor, id).await?;

        self.recipe_repo
            .replace_ingredients(id, self.ingredient_models(id, &ingredients))
            .await?;
        self.recipe_repo.touch(id).await?;

        self.detail(recipe).await
    }

    /// Link ingredient rows to shop products.
    ///
    /// Every ingredient ID must belong to the recipe; otherwise nothing is changed.
    pub async fn link_products(&self, id: &str, links: Vec<ProductLink>) -> AppResult<RecipeDetails> {
        let recipe = self.load(id).await?;

        let owned = self
            .recipe_repo
            .find_ingredients(std::slice::from_ref(&recipe.id))
            .await?;
        if let Some(stray) = links
            .iter()
            .find(|link| !owned.iter().any(|i| i.id == link.id))
        {
            return Err(AppError::BadRequest(format!(
                "Ingredient {} does not belong to recipe {id}",
                stray.id
            )));
        }

        for link in &links {
            self.recipe_repo
                .link_ingredient_product(id, &link.id, link.product_id)
                .await?;
        }

        self.detail(recipe).await
    }

    /// Distinct ingredient names across all recipes, sorted.
    pub async fn ingredient_names(&self) -> AppResult<Vec<String>> {
        self.recipe_repo.find_ingredient_names().await
    }

    /// Recipes written by `user_id`, newest first. The author and admins also
    /// see inactive ones.
    pub async fn by_user(
        &self,
        viewer: Option<&user::Model>,
        user_id: &str,
    ) -> AppResult<Vec<RecipeDetails>> {
        let include_inactive = viewer.is_some_and(|v| v.is_admin() || v.id == user_id);
        let recipes = self
            .recipe_repo
            .find_by_user(user_id, include_inactive)
            .await?;
        self.details(recipes).await
    }

    /// Publish a recipe and tell its author.
    pub async fn accept(&self, id: &str) -> AppResult<RecipeDetails> {
        let mut recipe = self.load(id).await?;
        self.recipe_repo.set_moderation_flags(id, true, true).await?;
        recipe.is_published = true;
        recipe.is_activate = true;

        tracing::info!(recipe_id = %id, "Recipe accepted");
        self.notify_author(&recipe, "Recipe Accepted", "Your recipe was public")
            .await;
        self.detail(recipe).await
    }

    /// Withdraw a recipe and tell its author why.
    pub async fn reject(&self, id: &str, feedback: Option<String>) -> AppResult<RecipeDetails> {
        let mut recipe = self.load(id).await?;
        self.recipe_repo
            .set_moderation_flags(id, false, false)
            .await?;
        recipe.is_published = false;
        recipe.is_activate = false;

        let reason = feedback
            .as_deref()
            .map(str::trim)
            .filter(|f| !f.is_empty())
            .unwrap_or("No reason given");

        tracing::info!(recipe_id = %id, "Recipe rejected");
        self.notify_author(&recipe, "Recipe Rejected", &format!("Reason: {reason}"))
            .await;
        self.detail(recipe).await
    }

    /// Best-effort notification; failures are logged, never propagated.
    pub(crate) async fn notify_author(&self, recipe: &recipe::Model, title: &str, content: &str) {
        if let Err(e) = self
            .notification_service
            .notify(&recipe.user_id, title, content, Some(&recipe.id))
            .await
        {
            tracing::warn!(recipe_id = %recipe.id, error = %e, "Failed to notify recipe author");
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod tests {
    use super::*;
    use chrono::Utc;
    use letcook_db::{
        entities::{notification, user::UserRole},
        repositories::NotificationRepository,
    };
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
    use serde_json::json;
    use std::sync::Arc;

    pub const RECIPE_ID: &str = "01hzx3k7q8v9w0y1z2a3b4c5d6";

    pub fn create_test_user(id: &str, role: UserRole) -> user::Model {
        user::Model {
            id: id.to_string(),
            username: format!("{id}_name"),
            email: None,
            bio: None,
            phone: None,
            address: None,
            avatar: Some(format!("https://cdn.example/{id}.png")),
            role,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    pub fn create_test_recipe(id: &str, user_id: &str, is_activate: bool) -> recipe::Model {
        recipe::Model {
            id: id.to_string(),
            user_id: user_id.to_string(),
            title: "Pho bo".to_string(),
            description: "Beef noodle soup".to_string(),
            cook_time: 120,
            serving: 4,
            difficulty: Some("medium".to_string()),
            images: json!(["https://cdn.example/pho.jpg"]),
            video: None,
            tags: json!(["soup", "beef"]),
            is_published: is_activate,
            is_activate,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    pub fn create_test_ingredient(id: &str, recipe_id: &str, name: &str) -> recipe_ingredient::Model {
        recipe_ingredient::Model {
            id: id.to_string(),
            recipe_id: recipe_id.to_string(),
            position: 0,
            name: name.to_string(),
            quantity: "200".to_string(),
            unit: Some("g".to_string()),
            product_id: None,
        }
    }

    pub fn exec_ok(rows: u64) -> MockExecResult {
        MockExecResult {
            last_insert_id: 0,
            rows_affected: rows,
        }
    }

    pub fn empty() -> MockDatabase {
        MockDatabase::new(DatabaseBackend::Postgres)
    }

    pub fn build_service(
        recipe_db: MockDatabase,
        user_db: MockDatabase,
        comment_db: MockDatabase,
        notification_db: MockDatabase,
    ) -> RecipeService {
        RecipeService::new(
            RecipeRepository::new(Arc::new(recipe_db.into_connection())),
            UserRepository::new(Arc::new(user_db.into_connection())),
            RecipeCommentRepository::new(Arc::new(comment_db.into_connection())),
            NotificationService::new(NotificationRepository::new(Arc::new(
                notification_db.into_connection(),
            ))),
        )
    }

    fn sample_input() -> RecipeInput {
        RecipeInput {
            title: "  Pho bo ".to_string(),
            description: "Beef noodle soup".to_string(),
            cook_time: 120,
            serving: 4,
            difficulty: Some("medium".to_string()),
            images: vec!["https://cdn.example/pho.jpg".to_string()],
            video: None,
            tags: vec!["soup".to_string(), "soup".to_string(), "beef".to_string()],
            steps: vec![StepInput {
                description: "Simmer the bones".to_string(),
                images: vec![],
            }],
            ingredients: vec![IngredientInput {
                name: "beef bones".to_string(),
                quantity: "1".to_string(),
                unit: Some("kg".to_string()),
                product_id: None,
            }],
        }
    }

    #[test]
    fn test_dedup_names_keeps_first_occurrence() {
        let names = vec![
            " soup ".to_string(),
            "beef".to_string(),
            "soup".to_string(),
            String::new(),
        ];
        assert_eq!(dedup_names(&names), vec!["soup", "beef"]);
    }

    #[tokio::test]
    async fn test_create_persists_fields_and_awaits_moderation() {
        let author = create_test_user("author", UserRole::User);
        let stored = create_test_recipe(RECIPE_ID, "author", false);

        let service = build_service(
            empty()
                .append_query_results([[stored]])
                .append_exec_results([exec_ok(0), exec_ok(1), exec_ok(0), exec_ok(1)])
                .append_query_results([Vec::<recipe_step::Model>::new()])
                .append_query_results([[create_test_ingredient("i1", RECIPE_ID, "beef bones")]]),
            empty().append_query_results([[author.clone()]]),
            empty(),
            empty(),
        );

        let details = service.create(&author, sample_input()).await.unwrap();

        assert_eq!(details.title, "Pho bo");
        assert_eq!(details.cook_time, 120);
        assert!(!details.is_activate);
        assert!(!details.is_published);
        assert_eq!(details.ingredients.len(), 1);
        assert_eq!(details.author.name.as_deref(), Some("author_name"));
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_serving() {
        let author = create_test_user("author", UserRole::User);
        let service = build_service(empty(), empty(), empty(), empty());

        let mut input = sample_input();
        input.serving = 0;

        let result = service.create(&author, input).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_create_rejects_blank_title() {
        let author = create_test_user("author", UserRole::User);
        // No queued results: any insert would fail with a database error instead.
        let service = build_service(empty(), empty(), empty(), empty());

        let mut input = sample_input();
        input.title = "   ".to_string();

        let result = service.create(&author, input).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_create_rejects_blank_ingredient_name() {
        let author = create_test_user("author", UserRole::User);
        let service = build_service(empty(), empty(), empty(), empty());

        let mut input = sample_input();
        input.ingredients[0].name = "  ".to_string();

        let result = service.create(&author, input).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_update_ingredients_rejects_blank_name() {
        let author = create_test_user("author", UserRole::User);
        let service = build_service(empty(), empty(), empty(), empty());

        let mut ingredient = sample_input().ingredients.remove(0);
        ingredient.name = "\t ".to_string();

        let result = service
            .update_ingredients(&author, RECIPE_ID, vec![ingredient])
            .await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[test]
    fn test_trimmed_input_keeps_inner_text() {
        let input = sample_input().trimmed();
        assert_eq!(input.title, "Pho bo");
        assert_eq!(input.ingredients[0].name, "beef bones");
        assert!(input.validate().is_ok());
    }

    #[tokio::test]
    async fn test_load_malformed_id_is_bad_request() {
        let service = build_service(empty(), empty(), empty(), empty());
        let result = service.load("not-an-id").await;
        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_get_missing_recipe_is_not_found() {
        let service = build_service(
            empty().append_query_results([Vec::<recipe::Model>::new()]),
            empty(),
            empty(),
            empty(),
        );

        let result = service.get(None, RECIPE_ID).await;
        assert!(matches!(result, Err(AppError::RecipeNotFound(_))));
    }

    #[tokio::test]
    async fn test_inactive_recipe_hidden_from_strangers() {
        let service = build_service(
            empty().append_query_results([[create_test_recipe(RECIPE_ID, "author", false)]]),
            empty(),
            empty(),
            empty(),
        );
        let stranger = create_test_user("stranger", UserRole::User);

        let result = service.get(Some(&stranger), RECIPE_ID).await;
        assert!(matches!(result, Err(AppError::RecipeNotFound(_))));
    }

    #[tokio::test]
    async fn test_update_by_stranger_forbidden() {
        let service = build_service(
            empty().append_query_results([[create_test_recipe(RECIPE_ID, "author", true)]]),
            empty(),
            empty(),
            empty(),
        );
        let stranger = create_test_user("stranger", UserRole::User);

        let result = service.update(&stranger, RECIPE_ID, sample_input()).await;
        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_link_products_rejects_foreign_ingredient() {
        let service = build_service(
            empty()
                .append_query_results([[create_test_recipe(RECIPE_ID, "author", true)]])
                .append_query_results([[create_test_ingredient("i1", RECIPE_ID, "beef")]]),
            empty(),
            empty(),
            empty(),
        );

        let result = service
            .link_products(
                RECIPE_ID,
                vec![ProductLink {
                    id: "elsewhere".to_string(),
                    product_id: Some(9),
                }],
            )
            .await;

        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_accept_publishes_and_notifies() {
        let author = create_test_user("author", UserRole::User);
        let pending = create_test_recipe(RECIPE_ID, "author", false);
        let sent = notification::Model {
            id: "n1".to_string(),
            user_id: "author".to_string(),
            title: "Recipe Accepted".to_string(),
            content: "Your recipe was public".to_string(),
            recipe_id: Some(RECIPE_ID.to_string()),
            is_read: false,
            created_at: Utc::now().into(),
        };

        let service = build_service(
            empty()
                .append_query_results([[pending]])
                .append_exec_results([exec_ok(1)])
                .append_query_results([Vec::<recipe_step::Model>::new()])
                .append_query_results([Vec::<recipe_ingredient::Model>::new()]),
            empty().append_query_results([[author]]),
            empty(),
            empty().append_query_results([[sent]]),
        );

        let details = service.accept(RECIPE_ID).await.unwrap();
        assert!(details.is_published);
        assert!(details.is_activate);
    }

    #[tokio::test]
    async fn test_reject_survives_notification_failure() {
        let pending = create_test_recipe(RECIPE_ID, "author", true);

        // The notification mock has no results queued, so the INSERT fails.
        let service = build_service(
            empty()
                .append_query_results([[pending]])
                .append_exec_results([exec_ok(1)])
                .append_query_results([Vec::<recipe_step::Model>::new()])
                .append_query_results([Vec::<recipe_ingredient::Model>::new()]),
            empty().append_query_results([Vec::<user::Model>::new()]),
            empty(),
            empty(),
        );

        let details = service
            .reject(RECIPE_ID, Some("Missing steps".to_string()))
            .await
            .unwrap();

        assert!(!details.is_activate);
        assert_eq!(details.author, AuthorSummary::default());
    }
}
