//! Following service.

use letcook_common::{AppError, AppResult, IdGenerator};
use letcook_db::{
    entities::{following, user},
    repositories::{FollowingRepository, UserRepository},
};
use sea_orm::Set;

/// Following service for managing follow relationships between users.
#[derive(Clone)]
pub struct FollowingService {
    following_repo: FollowingRepository,
    user_repo: UserRepository,
    id_gen: IdGenerator,
}

impl FollowingService {
    /// Create a new following service.
    #[must_use]
    pub const fn new(following_repo: FollowingRepository, user_repo: UserRepository) -> Self {
        Self {
            following_repo,
            user_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Follow `followee_id` on behalf of `follower_id`.
    ///
    /// Following someone already followed is a no-op. Returns the follower's
    /// updated following list.
    pub async fn follow(
        &self,
        follower_id: &str,
        followee_id: &str,
    ) -> AppResult<Vec<user::Model>> {
        if follower_id == followee_id {
            return Err(AppError::BadRequest("Cannot follow yourself".to_string()));
        }

        self.user_repo.get_by_id(follower_id).await?;
        self.user_repo.get_by_id(followee_id).await?;

        if self
            .following_repo
            .is_following(follower_id, followee_id)
            .await?
        {
            tracing::debug!(follower_id, followee_id, "Already following");
        } else {
            let model = following::ActiveModel {
                id: Set(self.id_gen.generate()),
                follower_id: Set(follower_id.to_string()),
                followee_id: Set(followee_id.to_string()),
                created_at: Set(chrono::Utc::now().into()),
            };
            self.following_repo.create(model).await?;
        }

        self.get_following(follower_id).await
    }

    /// Stop following `followee_id`. Not following is a no-op.
    pub async fn unfollow(
        &self,
        follower_id: &str,
        followee_id: &str,
    ) -> AppResult<Vec<user::Model>> {
        self.user_repo.get_by_id(follower_id).await?;

        if !self
            .following_repo
            .delete_by_pair(follower_id, followee_id)
            .await?
        {
            tracing::debug!(follower_id, followee_id, "Was not following");
        }

        self.get_following(follower_id).await
    }

    /// Users followed by `user_id`, most recently followed first.
    pub async fn get_following(&self, user_id: &str) -> AppResult<Vec<user::Model>> {
        let relations = self.following_repo.find_following(user_id).await?;
        let ids: Vec<String> = relations.iter().map(|f| f.followee_id.clone()).collect();
        self.users_in_order(&ids).await
    }

    /// Users following `user_id`, most recent first.
    pub async fn get_followers(&self, user_id: &str) -> AppResult<Vec<user::Model>> {
        let relations = self.following_repo.find_followers(user_id).await?;
        let ids: Vec<String> = relations.iter().map(|f| f.follower_id.clone()).collect();
        self.users_in_order(&ids).await
    }

    async fn users_in_order(&self, ids: &[String]) -> AppResult<Vec<user::Model>> {
        let mut users = self.user_repo.find_by_ids(ids).await?;
        users.sort_by_key(|u| ids.iter().position(|id| id == &u.id));
        Ok(users)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use letcook_db::entities::user::UserRole;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
    use std::sync::Arc;

    fn create_test_user(id: &str) -> user::Model {
        user::Model {
            id: id.to_string(),
            username: id.to_string(),
            email: None,
            bio: None,
            phone: None,
            address: None,
            avatar: None,
            role: UserRole::User,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    fn create_test_following(id: &str, follower_id: &str, followee_id: &str) -> following::Model {
        following::Model {
            id: id.to_string(),
            follower_id: follower_id.to_string(),
            followee_id: followee_id.to_string(),
            created_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_follow_self_rejected() {
        let service = FollowingService::new(
            FollowingRepository::new(Arc::new(
                MockDatabase::new(DatabaseBackend::Postgres).into_connection(),
            )),
            UserRepository::new(Arc::new(
                MockDatabase::new(DatabaseBackend::Postgres).into_connection(),
            )),
        );

        let result = service.follow("user1", "user1").await;
        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_follow_unknown_followee() {
        let user_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_user("user1")]])
                .append_query_results([Vec::<user::Model>::new()])
                .into_connection(),
        );
        let following_db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let service = FollowingService::new(
            FollowingRepository::new(following_db),
            UserRepository::new(user_db),
        );

        let result = service.follow("user1", "ghost").await;
        assert!(matches!(result, Err(AppError::UserNotFound(_))));
    }

    #[tokio::test]
    async fn test_follow_twice_does_not_insert() {
        let existing = create_test_following("f1", "user1", "user2");

        let user_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_user("user1")]])
                .append_query_results([[create_test_user("user2")]])
                .append_query_results([[create_test_user("user2")]])
                .into_connection(),
        );
        // is_following hit, then the following list; no INSERT result is queued.
        let following_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[existing.clone()]])
                .append_query_results([[existing]])
                .into_connection(),
        );

        let service = FollowingService::new(
            FollowingRepository::new(following_db),
            UserRepository::new(user_db),
        );

        let following = service.follow("user1", "user2").await.unwrap();
        assert_eq!(following.len(), 1);
        assert_eq!(following[0].id, "user2");
    }

    #[tokio::test]
    async fn test_follow_inserts_new_relation() {
        let created = create_test_following("f1", "user1", "user2");

        let user_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_user("user1")]])
                .append_query_results([[create_test_user("user2")]])
                .append_query_results([[create_test_user("user2")]])
                .into_connection(),
        );
        let following_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<following::Model>::new()])
                .append_query_results([[created.clone()]])
                .append_query_results([[created]])
                .into_connection(),
        );

        let service = FollowingService::new(
            FollowingRepository::new(following_db),
            UserRepository::new(user_db),
        );

        let following = service.follow("user1", "user2").await.unwrap();
        assert_eq!(following.len(), 1);
    }

    #[tokio::test]
    async fn test_unfollow_is_idempotent() {
        let user_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_user("user1")]])
                .into_connection(),
        );
        let following_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 0,
                }])
                .append_query_results([Vec::<following::Model>::new()])
                .into_connection(),
        );

        let service = FollowingService::new(
            FollowingRepository::new(following_db),
            UserRepository::new(user_db),
        );

        let following = service.unfollow("user1", "user2").await.unwrap();
        assert!(following.is_empty());
    }
}
