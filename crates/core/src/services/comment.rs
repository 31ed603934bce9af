//! Recipe comment service.

use letcook_common::{AppResult, IdGenerator};
use letcook_db::{
    entities::{recipe_comment, user},
    repositories::{RecipeCommentRepository, RecipeRepository},
};
use sea_orm::Set;
use serde::Deserialize;
use validator::Validate;

use super::recipe::{RecipeService, RecipeWithComments};

/// Input for posting a comment.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateCommentInput {
    #[validate(length(min = 1, max = 2000))]
    pub content: String,
}

/// Comment service.
#[derive(Clone)]
pub struct CommentService {
    comment_repo: RecipeCommentRepository,
    recipe_repo: RecipeRepository,
    recipe_service: RecipeService,
    id_gen: IdGenerator,
}

impl CommentService {
    /// Create a new comment service.
    #[must_use]
    pub const fn new(
        comment_repo: RecipeCommentRepository,
        recipe_repo: RecipeRepository,
        recipe_service: RecipeService,
    ) -> Self {
        Self {
            comment_repo,
            recipe_repo,
            recipe_service,
            id_gen: IdGenerator::new(),
        }
    }

    /// Post a comment and return the refreshed recipe with its thread.
    pub async fn create(
        &self,
        author: &user::Model,
        recipe_id: &str,
        input: CreateCommentInput,
    ) -> AppResult<RecipeWithComments> {
        let input = CreateCommentInput {
            content: input.content.trim().to_string(),
        };
        input.validate()?;

        self.recipe_service.load(recipe_id).await?;

        let model = recipe_comment::ActiveModel {
            id: Set(self.id_gen.generate()),
            recipe_id: Set(recipe_id.to_string()),
            user_id: Set(author.id.clone()),
            content: Set(input.content),
            created_at: Set(chrono::Utc::now().into()),
        };
        self.comment_repo.create(model).await?;
        self.recipe_repo.touch(recipe_id).await?;

        self.recipe_service.get(Some(author), recipe_id).await
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
    use letcook_common::AppError;
    use letcook_db::entities::{recipe_ingredient, recipe_step, user::UserRole};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_create_rejects_whitespace_only() {
        let author = create_test_user("author", UserRole::User);
        let service = CommentService::new(
            RecipeCommentRepository::new(Arc::new(empty().into_connection())),
            RecipeRepository::new(Arc::new(empty().into_connection())),
            build_service(empty(), empty(), empty(), empty()),
        );

        let result = service
            .create(
                &author,
                RECIPE_ID,
                CreateCommentInput {
                    content: "   ".to_string(),
                },
            )
            .await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_create_on_missing_recipe_is_not_found() {
        let author = create_test_user("author", UserRole::User);
        let service = CommentService::new(
            RecipeCommentRepository::new(Arc::new(empty().into_connection())),
            RecipeRepository::new(Arc::new(empty().into_connection())),
            build_service(
                empty().append_query_results([Vec::<letcook_db::entities::recipe::Model>::new()]),
                empty(),
                empty(),
                empty(),
            ),
        );

        let result = service
            .create(
                &author,
                RECIPE_ID,
                CreateCommentInput {
                    content: "Delicious".to_string(),
                },
            )
            .await;
        assert!(matches!(result, Err(AppError::RecipeNotFound(_))));
    }

    #[tokio::test]
    async fn test_create_returns_thread_with_new_comment() {
        let author = create_test_user("author", UserRole::User);
        let recipe = create_test_recipe(RECIPE_ID, "author", true);
        let comment = recipe_comment::Model {
            id: "c1".to_string(),
            recipe_id: RECIPE_ID.to_string(),
            user_id: "author".to_string(),
            content: "Delicious".to_string(),
            created_at: Utc::now().into(),
        };

        let comment_repo_db = empty().append_query_results([[comment.clone()]]);
        let recipe_repo_db = empty().append_exec_results([exec_ok(1)]);

        let service = CommentService::new(
            RecipeCommentRepository::new(Arc::new(comment_repo_db.into_connection())),
            RecipeRepository::new(Arc::new(recipe_repo_db.into_connection())),
            build_service(
                empty()
                    .append_query_results([[recipe.clone()], [recipe]])
                    .append_query_results([Vec::<recipe_step::Model>::new()])
                    .append_query_results([Vec::<recipe_ingredient::Model>::new()]),
                empty()
                    .append_query_results([[author.clone()]])
                    .append_query_results([[author.clone()]]),
                empty().append_query_results([[comment]]),
                empty(),
            ),
        );

        let thread = service
            .create(
                &author,
                RECIPE_ID,
                CreateCommentInput {
                    content: "  Delicious ".to_string(),
                },
            )
            .await
            .unwrap();

        assert_eq!(thread.comments.len(), 1);
        assert_eq!(thread.comments[0].content, "Delicious");
        assert_eq!(thread.comments[0].author.id.as_deref(), Some("author"));
    }
}
