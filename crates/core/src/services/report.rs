//! Recipe report and moderation service.

use letcook_common::{AppError, AppResult, IdGenerator};
use letcook_db::{
    entities::{recipe_report, user},
    repositories::{RecipeReportRepository, RecipeRepository},
};
use sea_orm::Set;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::recipe::{RecipeDetails, RecipeService};

/// Input for reporting a recipe.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateReportInput {
    #[validate(length(min = 1, max = 1000))]
    pub report: String,
}

/// A recipe with the number of reports filed against it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportedRecipe {
    pub recipe_id: String,
    pub title: String,
    pub report_count: i64,
}

/// Report service.
#[derive(Clone)]
pub struct ReportService {
    report_repo: RecipeReportRepository,
    recipe_repo: RecipeRepository,
    recipe_service: RecipeService,
    id_gen: IdGenerator,
}

impl ReportService {
    /// Create a new report service.
    #[must_use]
    pub const fn new(
        report_repo: RecipeReportRepository,
        recipe_repo: RecipeRepository,
        recipe_service: RecipeService,
    ) -> Self {
        Self {
            report_repo,
            recipe_repo,
            recipe_service,
            id_gen: IdGenerator::new(),
        }
    }

    /// File a report. Each user may report a recipe once.
    pub async fn report(
        &self,
        reporter: &user::Model,
        recipe_id: &str,
        input: CreateReportInput,
    ) -> AppResult<recipe_report::Model> {
        let input = CreateReportInput {
            report: input.report.trim().to_string(),
        };
        input.validate()?;

        self.recipe_service.load(recipe_id).await?;

        if self
            .report_repo
            .find_by_pair(recipe_id, &reporter.id)
            .await?
            .is_some()
        {
            return Err(AppError::Conflict(
                "You have already reported this recipe".to_string(),
            ));
        }

        let model = recipe_report::ActiveModel {
            id: Set(self.id_gen.generate()),
            recipe_id: Set(recipe_id.to_string()),
            user_id: Set(reporter.id.clone()),
            report: Set(input.report),
            created_at: Set(chrono::Utc::now().into()),
        };

        match self.report_repo.create(model).await {
            Ok(report) => {
                tracing::info!(recipe_id, user_id = %reporter.id, "Recipe reported");
                Ok(report)
            }
            // The unique index caught a concurrent duplicate.
            Err(e) => match self.report_repo.find_by_pair(recipe_id, &reporter.id).await? {
                Some(_) => Err(AppError::Conflict(
                    "You have already reported this recipe".to_string(),
                )),
                None => Err(e),
            },
        }
    }

    /// Report totals for recipes that are still active, most reported first.
    pub async fn reported(&self) -> AppResult<Vec<ReportedRecipe>> {
        let counts = self.report_repo.count_by_active_recipe().await?;
        Ok(counts
            .into_iter()
            .map(|c| ReportedRecipe {
                recipe_id: c.recipe_id,
                title: c.title,
                report_count: c.report_count,
            })
            .collect())
    }

    /// Every report on one recipe.
    pub async fn reports_for(&self, recipe_id: &str) -> AppResult<Vec<recipe_report::Model>> {
        self.recipe_service.load(recipe_id).await?;
        self.report_repo.find_by_recipe(recipe_id).await
    }

    /// Take a reported recipe down and clear its reports.
    pub async fn block(&self, recipe_id: &str) -> AppResult<RecipeDetails> {
        let mut recipe = self.recipe_service.load(recipe_id).await?;

        self.recipe_repo
            .set_moderation_flags(recipe_id, false, false)
            .await?;
        recipe.is_published = false;
        recipe.is_activate = false;

        let cleared = self.report_repo.delete_by_recipe(recipe_id).await?;
        tracing::info!(recipe_id, cleared, "Recipe blocked");

        self.recipe_service
            .notify_author(
                &recipe,
                "Recipe Blocked",
                "Your recipe was blocked after being reported by other users",
            )
            .await;

        self.recipe_service.detail(recipe).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::services::recipe::tests::{
        RECIPE_ID, build_service, create_test_recipe, create_test_user, empty, exec_ok,
    };
    use chrono::Utc;
    use letcook_db::entities::{recipe_ingredient, recipe_step, user::UserRole};
    use std::sync::Arc;

    fn create_test_report() -> recipe_report::Model {
        recipe_report::Model {
            id: "rep1".to_string(),
            recipe_id: RECIPE_ID.to_string(),
            user_id: "user1".to_string(),
            report: "Spam".to_string(),
            created_at: Utc::now().into(),
        }
    }

    fn service_with(report_db: sea_orm::MockDatabase, recipe_db: sea_orm::MockDatabase) -> ReportService {
        ReportService::new(
            RecipeReportRepository::new(Arc::new(report_db.into_connection())),
            RecipeRepository::new(Arc::new(recipe_db.into_connection())),
            build_service(
                empty()
                    .append_query_results([[create_test_recipe(RECIPE_ID, "author", true)]])
                    .append_query_results([Vec::<recipe_step::Model>::new()])
                    .append_query_results([Vec::<recipe_ingredient::Model>::new()]),
                empty().append_query_results([Vec::<user::Model>::new()]),
                empty(),
                empty(),
            ),
        )
    }

    #[tokio::test]
    async fn test_second_report_conflicts() {
        let reporter = create_test_user("user1", UserRole::User);
        let service = service_with(empty().append_query_results([[create_test_report()]]), empty());

        let result = service
            .report(
                &reporter,
                RECIPE_ID,
                CreateReportInput {
                    report: "Spam".to_string(),
                },
            )
            .await;
        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_first_report_is_stored() {
        let reporter = create_test_user("user1", UserRole::User);
        let service = service_with(
            empty()
                .append_query_results([Vec::<recipe_report::Model>::new()])
                .append_query_results([[create_test_report()]]),
            empty(),
        );

        let report = service
            .report(
                &reporter,
                RECIPE_ID,
                CreateReportInput {
                    report: " Spam ".to_string(),
                },
            )
            .await
            .unwrap();
        assert_eq!(report.report, "Spam");
    }

    #[tokio::test]
    async fn test_empty_report_rejected() {
        let reporter = create_test_user("user1", UserRole::User);
        let service = service_with(empty(), empty());

        let result = service
            .report(
                &reporter,
                RECIPE_ID,
                CreateReportInput {
                    report: " ".to_string(),
                },
            )
            .await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_block_deactivates_and_clears_reports() {
        let service = service_with(
            empty().append_exec_results([exec_ok(2)]),
            empty().append_exec_results([exec_ok(1)]),
        );

        let details = service.block(RECIPE_ID).await.unwrap();
        assert!(!details.is_activate);
        assert!(!details.is_published);
    }
}
