//! Recipe repository: recipes plus their step and ingredient rows.

use std::sync::Arc;

use crate::entities::{Recipe, RecipeIngredient, RecipeStep, recipe, recipe_ingredient, recipe_step};
use chrono::{DateTime, Utc};
use letcook_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect,
    sea_query::{Expr, Func, Query, SelectStatement, SimpleExpr},
};

/// Build a case-insensitive `LIKE` pattern matching `term` as a substring.
///
/// `\`, `%` and `_` in the term are escaped so user input never acts as a wildcard.
#[must_use]
pub fn contains_pattern(term: &str) -> String {
    let escaped = term
        .to_lowercase()
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}

/// Sub-select of recipe IDs owning an ingredient whose name matches `pattern`.
fn recipes_with_ingredient(pattern: &str) -> SelectStatement {
    Query::select()
        .column(recipe_ingredient::Column::RecipeId)
        .from(RecipeIngredient)
        .and_where(
            Expr::expr(Func::lower(Expr::col((
                RecipeIngredient,
                recipe_ingredient::Column::Name,
            ))))
            .like(pattern),
        )
        .to_owned()
}

/// Whether any element of the recipe's tag array matches `pattern`.
fn tag_matches(pattern: &str) -> SimpleExpr {
    Expr::cust_with_values(
        r#"EXISTS (SELECT 1 FROM jsonb_array_elements_text("recipe"."tags") AS tag(name) WHERE LOWER(tag.name) LIKE $1)"#,
        [pattern.to_string()],
    )
}

/// Filter behind [`RecipeRepository::search_candidates`].
fn search_condition(terms: &[String], ingredients: &[String]) -> Condition {
    let mut condition = Condition::all()
        .add(recipe::Column::IsPublished.eq(true))
        .add(recipe::Column::IsActivate.eq(true));

    if !terms.is_empty() {
        let mut any_term = Condition::any();
        for term in terms {
            let pattern = contains_pattern(term);
            any_term = any_term
                .add(
                    Expr::expr(Func::lower(Expr::col((Recipe, recipe::Column::Title))))
                        .like(pattern.as_str()),
                )
                .add(
                    Expr::expr(Func::lower(Expr::col((Recipe, recipe::Column::Description))))
                        .like(pattern.as_str()),
                )
                .add(tag_matches(&pattern))
                .add(recipe::Column::Id.in_subquery(recipes_with_ingredient(&pattern)));
        }
        condition = condition.add(any_term);
    }

    if !ingredients.is_empty() {
        let mut any_ingredient = Condition::any();
        for name in ingredients {
            any_ingredient = any_ingredient.add(
                recipe::Column::Id.in_subquery(recipes_with_ingredient(&contains_pattern(name))),
            );
        }
        condition = condition.add(any_ingredient);
    }

    condition
}

/// Recipe repository for database operations.
#[derive(Clone)]
pub struct RecipeRepository {
    db: Arc<DatabaseConnection>,
}

impl RecipeRepository {
    /// Create a new recipe repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a recipe by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<recipe::Model>> {
        Recipe::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a recipe by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<recipe::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::RecipeNotFound(id.to_string()))
    }

    /// Find recipes by IDs. Order is unspecified.
    pub async fn find_by_ids(&self, ids: &[String]) -> AppResult<Vec<recipe::Model>> {
        if ids.is_empty() {
            return Ok(vec![]);
        }

        Recipe::find()
            .filter(recipe::Column::Id.is_in(ids.to_vec()))
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new recipe.
    pub async fn create(&self, model: recipe::ActiveModel) -> AppResult<recipe::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update a recipe.
    pub async fn update(&self, model: recipe::ActiveModel) -> AppResult<recipe::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Active recipes, oldest first, optionally restricted to published ones.
    pub async fn find_active(
        &self,
        published_only: bool,
        offset: u64,
        limit: u64,
    ) -> AppResult<Vec<recipe::Model>> {
        let mut query = Recipe::find().filter(recipe::Column::IsActivate.eq(true));
        if published_only {
            query = query.filter(recipe::Column::IsPublished.eq(true));
        }

        query
            .order_by_asc(recipe::Column::CreatedAt)
            .offset(offset)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count active recipes, optionally restricted to published ones.
    pub async fn count_active(&self, published_only: bool) -> AppResult<u64> {
        let mut query = Recipe::find().filter(recipe::Column::IsActivate.eq(true));
        if published_only {
            query = query.filter(recipe::Column::IsPublished.eq(true));
        }

        query
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Every recipe regardless of moderation state, newest first.
    pub async fn find_all(&self) -> AppResult<Vec<recipe::Model>> {
        Recipe::find()
            .order_by_desc(recipe::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Recipes written by a user, newest first.
    pub async fn find_by_user(
        &self,
        user_id: &str,
        include_inactive: bool,
    ) -> AppResult<Vec<recipe::Model>> {
        let mut query = Recipe::find().filter(recipe::Column::UserId.eq(user_id));
        if !include_inactive {
            query = query.filter(recipe::Column::IsActivate.eq(true));
        }

        query
            .order_by_desc(recipe::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Set `updated_at` to now without loading the row.
    pub async fn touch(&self, id: &str) -> AppResult<()> {
        Recipe::update_many()
            .col_expr(recipe::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(recipe::Column::Id.eq(id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Set both moderation flags in a single UPDATE.
    pub async fn set_moderation_flags(
        &self,
        id: &str,
        is_published: bool,
        is_activate: bool,
    ) -> AppResult<u64> {
        let result = Recipe::update_many()
            .col_expr(recipe::Column::IsPublished, Expr::value(is_published))
            .col_expr(recipe::Column::IsActivate, Expr::value(is_activate))
            .col_expr(recipe::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(recipe::Column::Id.eq(id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(result.rows_affected)
    }

    // === Steps ===

    /// Steps of the given recipes ordered by recipe then position.
    pub async fn find_steps(&self, recipe_ids: &[String]) -> AppResult<Vec<recipe_step::Model>> {
        if recipe_ids.is_empty() {
            return Ok(vec![]);
        }

        RecipeStep::find()
            .filter(recipe_step::Column::RecipeId.is_in(recipe_ids.to_vec()))
            .order_by_asc(recipe_step::Column::RecipeId)
            .order_by_asc(recipe_step::Column::Position)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a recipe's steps and insert `steps` in their place.
    pub async fn replace_steps(
        &self,
        recipe_id: &str,
        steps: Vec<recipe_step::ActiveModel>,
    ) -> AppResult<()> {
        RecipeStep::delete_many()
            .filter(recipe_step::Column::RecipeId.eq(recipe_id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        if steps.is_empty() {
            return Ok(());
        }

        RecipeStep::insert_many(steps)
            .exec_without_returning(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    // === Ingredients ===

    /// Ingredients of the given recipes ordered by recipe then position.
    pub async fn find_ingredients(
        &self,
        recipe_ids: &[String],
    ) -> AppResult<Vec<recipe_ingredient::Model>> {
        if recipe_ids.is_empty() {
            return Ok(vec![]);
        }

        RecipeIngredient::find()
            .filter(recipe_ingredient::Column::RecipeId.is_in(recipe_ids.to_vec()))
            .order_by_asc(recipe_ingredient::Column::RecipeId)
            .order_by_asc(recipe_ingredient::Column::Position)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a recipe's ingredients and insert `ingredients` in their place.
    pub async fn replace_ingredients(
        &self,
        recipe_id: &str,
        ingredients: Vec<recipe_ingredient::ActiveModel>,
    ) -> AppResult<()> {
        RecipeIngredient::delete_many()
            .filter(recipe_ingredient::Column::RecipeId.eq(recipe_id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        if ingredients.is_empty() {
            return Ok(());
        }

        RecipeIngredient::insert_many(ingredients)
            .exec_without_returning(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Point one ingredient of a recipe at a shop product.
    ///
    /// Returns the number of rows changed: 0 when the ingredient is not part of the recipe.
    pub async fn link_ingredient_product(
        &self,
        recipe_id: &str,
        ingredient_id: &str,
        product_id: Option<i32>,
    ) -> AppResult<u64> {
        let result = RecipeIngredient::update_many()
            .col_expr(recipe_ingredient::Column::ProductId, Expr::value(product_id))
            .filter(recipe_ingredient::Column::Id.eq(ingredient_id))
            .filter(recipe_ingredient::Column::RecipeId.eq(recipe_id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(result.rows_affected)
    }

    /// Distinct ingredient names across all recipes, sorted.
    pub async fn find_ingredient_names(&self) -> AppResult<Vec<String>> {
        RecipeIngredient::find()
            .select_only()
            .column(recipe_ingredient::Column::Name)
            .distinct()
            .order_by_asc(recipe_ingredient::Column::Name)
            .into_tuple::<String>()
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    // === Search ===

    /// Published, active recipes matching any of `terms` in title, description,
    /// tags or an ingredient name, and owning an ingredient matching one of
    /// `ingredients` when that list is non-empty.
    pub async fn search_candidates(
        &self,
        terms: &[String],
        ingredients: &[String],
    ) -> AppResult<Vec<recipe::Model>> {
        if terms.is_empty() && ingredients.is_empty() {
            return Ok(vec![]);
        }

        let condition = search_condition(terms, ingredients);
        Recipe::find()
            .filter(condition)
            .order_by_desc(recipe::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    // === Statistics ===

    /// Count all recipes.
    pub async fn count(&self) -> AppResult<u64> {
        Recipe::find()
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count recipes awaiting moderation or blocked.
    pub async fn count_inactive(&self) -> AppResult<u64> {
        Recipe::find()
            .filter(recipe::Column::IsActivate.eq(false))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count recipes created in `[start, end)`.
    pub async fn count_created_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> AppResult<u64> {
        Recipe::find()
            .filter(recipe::Column::CreatedAt.gte(start))
            .filter(recipe::Column::CreatedAt.lt(end))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult, QueryTrait};
    use serde_json::json;

    fn create_test_recipe(id: &str, title: &str) -> recipe::Model {
        recipe::Model {
            id: id.to_string(),
            user_id: "user1".to_string(),
            title: title.to_string(),
            description: "A test recipe".to_string(),
            cook_time: 30,
            serving: 2,
            difficulty: None,
            images: json!([]),
            video: None,
            tags: json!(["soup"]),
            is_published: true,
            is_activate: true,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    fn create_test_ingredient(id: &str, recipe_id: &str, name: &str) -> recipe_ingredient::Model {
        recipe_ingredient::Model {
            id: id.to_string(),
            recipe_id: recipe_id.to_string(),
            position: 0,
            name: name.to_string(),
            quantity: "1".to_string(),
            unit: None,
            product_id: None,
        }
    }

    #[test]
    fn test_contains_pattern_escapes_wildcards() {
        assert_eq!(contains_pattern("Pho"), "%pho%");
        assert_eq!(contains_pattern("100%_"), "%100\\%\\_%");
        assert_eq!(contains_pattern("a\\b"), "%a\\\\b%");
    }

    #[tokio::test]
    async fn test_get_by_id_not_found_returns_error() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<recipe::Model>::new()])
                .into_connection(),
        );

        let repo = RecipeRepository::new(db);
        match repo.get_by_id("missing").await {
            Err(AppError::RecipeNotFound(id)) => assert_eq!(id, "missing"),
            _ => panic!("Expected RecipeNotFound error"),
        }
    }

    #[tokio::test]
    async fn test_find_active() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[
                    create_test_recipe("r1", "Pho"),
                    create_test_recipe("r2", "Banh mi"),
                ]])
                .into_connection(),
        );

        let repo = RecipeRepository::new(db);
        let recipes = repo.find_active(true, 0, 10).await.unwrap();

        assert_eq!(recipes.len(), 2);
        assert_eq!(recipes[0].title, "Pho");
    }

    #[tokio::test]
    async fn test_replace_ingredients_with_empty_list_only_deletes() {
        // A single exec result: an INSERT would exhaust the mock.
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 3,
                }])
                .into_connection(),
        );

        let repo = RecipeRepository::new(db);
        repo.replace_ingredients("r1", vec![]).await.unwrap();
    }

    #[tokio::test]
    async fn test_find_ingredients_groups_by_recipe() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[
                    create_test_ingredient("i1", "r1", "rice noodles"),
                    create_test_ingredient("i2", "r2", "beef"),
                ]])
                .into_connection(),
        );

        let repo = RecipeRepository::new(db);
        let ingredients = repo
            .find_ingredients(&["r1".to_string(), "r2".to_string()])
            .await
            .unwrap();

        assert_eq!(ingredients.len(), 2);
        assert_eq!(ingredients[1].recipe_id, "r2");
    }

    #[tokio::test]
    async fn test_link_ingredient_product_outside_recipe_changes_nothing() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 0,
                }])
                .into_connection(),
        );

        let repo = RecipeRepository::new(db);
        let changed = repo
            .link_ingredient_product("r1", "other", Some(4))
            .await
            .unwrap();

        assert_eq!(changed, 0);
    }

    #[tokio::test]
    async fn test_search_candidates_without_terms_skips_query() {
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let repo = RecipeRepository::new(db);
        let result = repo.search_candidates(&[], &[]).await.unwrap();

        assert!(result.is_empty());
    }

    #[tokio::test]
    async fn test_search_candidates_returns_matches() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_recipe("r1", "Pho bo")]])
                .into_connection(),
        );

        let repo = RecipeRepository::new(db);
        let result = repo
            .search_candidates(&["pho".to_string()], &["beef".to_string()])
            .await
            .unwrap();

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].id, "r1");
    }

    fn search_sql(terms: &[&str], ingredients: &[&str]) -> String {
        let terms: Vec<String> = terms.iter().map(ToString::to_string).collect();
        let ingredients: Vec<String> = ingredients.iter().map(ToString::to_string).collect();
        Recipe::find()
            .filter(search_condition(&terms, &ingredients))
            .build(DatabaseBackend::Postgres)
            .to_string()
    }

    #[test]
    fn test_search_matches_tag_elements_not_json_text() {
        let sql = search_sql(&["soup"], &[]);

        assert!(sql.contains(r#"jsonb_array_elements_text("recipe"."tags") AS tag(name)"#));
        assert!(sql.contains("LOWER(tag.name) LIKE '%soup%'"));
        assert!(!sql.contains("AS TEXT"));
    }

    #[test]
    fn test_search_bracket_term_is_plain_substring() {
        // JSON punctuation must only match inside tag values
        let sql = search_sql(&["["], &[]);

        assert!(sql.contains("LOWER(tag.name) LIKE '%[%'"));
        assert!(!sql.contains(r#"CAST("recipe"."tags""#));
    }

    #[test]
    fn test_search_ingredient_filter_is_required() {
        let sql = search_sql(&["pho"], &["beef"]);

        assert!(sql.contains(r#""is_published" = TRUE"#));
        assert!(sql.contains("'%beef%'"));
        assert!(sql.contains(" AND "));
    }

    #[tokio::test]
    async fn test_count_inactive() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[maplit::btreemap! {
                    "num_items" => sea_orm::Value::BigInt(Some(3))
                }]])
                .into_connection(),
        );

        let repo = RecipeRepository::new(db);
        assert_eq!(repo.count_inactive().await.unwrap(), 3);
    }
}
