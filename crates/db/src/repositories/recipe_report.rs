//! Recipe report repository.

use std::sync::Arc;

use crate::entities::{RecipeReport, recipe, recipe_report};
use letcook_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, FromQueryResult, JoinType,
    QueryFilter, QueryOrder, QuerySelect, RelationTrait, sea_query::Expr,
};

/// Number of reports filed against one recipe.
#[derive(Debug, Clone, PartialEq, Eq, FromQueryResult)]
pub struct ReportCount {
    /// The reported recipe.
    pub recipe_id: String,
    /// Title of the reported recipe.
    pub title: String,
    /// How many users reported it.
    pub report_count: i64,
}

/// Recipe report repository for database operations.
#[derive(Clone)]
pub struct RecipeReportRepository {
    db: Arc<DatabaseConnection>,
}

impl RecipeReportRepository {
    /// Create a new recipe report repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find the report a user filed against a recipe.
    pub async fn find_by_pair(
        &self,
        recipe_id: &str,
        user_id: &str,
    ) -> AppResult<Option<recipe_report::Model>> {
        RecipeReport::find()
            .filter(recipe_report::Column::RecipeId.eq(recipe_id))
            .filter(recipe_report::Column::UserId.eq(user_id))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new report.
    pub async fn create(
        &self,
        model: recipe_report::ActiveModel,
    ) -> AppResult<recipe_report::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Reports filed against a recipe, newest first.
    pub async fn find_by_recipe(&self, recipe_id: &str) -> AppResult<Vec<recipe_report::Model>> {
        RecipeReport::find()
            .filter(recipe_report::Column::RecipeId.eq(recipe_id))
            .order_by_desc(recipe_report::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete every report on a recipe.
    pub async fn delete_by_recipe(&self, recipe_id: &str) -> AppResult<u64> {
        let result = RecipeReport::delete_many()
            .filter(recipe_report::Column::RecipeId.eq(recipe_id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(result.rows_affected)
    }

    /// Report totals per recipe, restricted to recipes that are still active,
    /// most reported first.
    pub async fn count_by_active_recipe(&self) -> AppResult<Vec<ReportCount>> {
        RecipeReport::find()
            .select_only()
            .column(recipe_report::Column::RecipeId)
            .column_as(recipe::Column::Title, "title")
            .column_as(recipe_report::Column::Id.count(), "report_count")
            .join(JoinType::InnerJoin, recipe_report::Relation::Recipe.def())
            .filter(recipe::Column::IsActivate.eq(true))
            .group_by(recipe_report::Column::RecipeId)
            .group_by(recipe::Column::Title)
            .order_by_desc(Expr::cust("report_count"))
            .into_model::<ReportCount>()
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    #[tokio::test]
    async fn test_find_by_pair_found() {
        let report = recipe_report::Model {
            id: "rep1".to_string(),
            recipe_id: "r1".to_string(),
            user_id: "user1".to_string(),
            report: "Spam".to_string(),
            created_at: Utc::now().into(),
        };

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[report]])
                .into_connection(),
        );

        let repo = RecipeReportRepository::new(db);
        let found = repo.find_by_pair("r1", "user1").await.unwrap();

        assert_eq!(found.unwrap().report, "Spam");
    }

    #[tokio::test]
    async fn test_count_by_active_recipe() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[
                    maplit::btreemap! {
                        "recipe_id" => sea_orm::Value::from("r1"),
                        "title" => sea_orm::Value::from("Pho"),
                        "report_count" => sea_orm::Value::BigInt(Some(3)),
                    },
                    maplit::btreemap! {
                        "recipe_id" => sea_orm::Value::from("r2"),
                        "title" => sea_orm::Value::from("Banh mi"),
                        "report_count" => sea_orm::Value::BigInt(Some(1)),
                    },
                ]])
                .into_connection(),
        );

        let repo = RecipeReportRepository::new(db);
        let counts = repo.count_by_active_recipe().await.unwrap();

        assert_eq!(counts.len(), 2);
        assert_eq!(counts[0].recipe_id, "r1");
        assert_eq!(counts[0].report_count, 3);
    }

    #[tokio::test]
    async fn test_delete_by_recipe() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 2,
                }])
                .into_connection(),
        );

        let repo = RecipeReportRepository::new(db);
        assert_eq!(repo.delete_by_recipe("r1").await.unwrap(), 2);
    }
}
