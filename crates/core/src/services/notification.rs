//! Notification service.

use letcook_common::{AppError, AppResult, IdGenerator};
use letcook_db::{entities::notification, repositories::NotificationRepository};
use sea_orm::Set;

/// Default page size for the notification inbox.
pub const DEFAULT_LIMIT: u64 = 20;
/// Largest page size a caller may request.
pub const MAX_LIMIT: u64 = 100;

/// Notification service for creating and reading user notifications.
#[derive(Clone)]
pub struct NotificationService {
    notification_repo: NotificationRepository,
    id_gen: IdGenerator,
}

impl NotificationService {
    /// Create a new notification service.
    #[must_use]
    pub const fn new(notification_repo: NotificationRepository) -> Self {
        Self {
            notification_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Send a notification to a user.
    pub async fn notify(
        &self,
        user_id: &str,
        title: &str,
        content: &str,
        recipe_id: Option<&str>,
    ) -> AppResult<notification::Model> {
        let model = notification::ActiveModel {
            id: Set(self.id_gen.generate()),
            user_id: Set(user_id.to_string()),
            title: Set(title.to_string()),
            content: Set(content.to_string()),
            recipe_id: Set(recipe_id.map(ToString::to_string)),
            is_read: Set(false),
            created_at: Set(chrono::Utc::now().into()),
        };

        self.notification_repo.create(model).await
    }

    /// A user's notifications, newest first. `limit` is clamped to `1..=MAX_LIMIT`.
    pub async fn list(
        &self,
        user_id: &str,
        limit: Option<u64>,
    ) -> AppResult<Vec<notification::Model>> {
        let limit = limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
        self.notification_repo.find_by_user(user_id, limit).await
    }

    /// Mark one of the user's notifications as read.
    pub async fn mark_as_read(&self, user_id: &str, notification_id: &str) -> AppResult<()> {
        let notification = self
            .notification_repo
            .find_by_id(notification_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Notification {notification_id}")))?;

        if notification.user_id != user_id {
            return Err(AppError::Forbidden(
                "Notification belongs to another user".to_string(),
            ));
        }

        if !notification.is_read {
            self.notification_repo.mark_as_read(notification_id).await?;
        }
        Ok(())
    }

    /// Count the user's unread notifications.
    pub async fn unread_count(&self, user_id: &str) -> AppResult<u64> {
        self.notification_repo.count_unread(user_id).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
    use std::sync::Arc;

    fn create_test_notification(id: &str, user_id: &str, is_read: bool) -> notification::Model {
        notification::Model {
            id: id.to_string(),
            user_id: user_id.to_string(),
            title: "Recipe Accepted".to_string(),
            content: "Your recipe was public".to_string(),
            recipe_id: Some("r1".to_string()),
            is_read,
            created_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_notify_creates_unread_notification() {
        let created = create_test_notification("n1", "user1", false);
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[created]])
                .into_connection(),
        );

        let service = NotificationService::new(NotificationRepository::new(db));
        let result = service
            .notify("user1", "Recipe Accepted", "Your recipe was public", Some("r1"))
            .await
            .unwrap();

        assert_eq!(result.user_id, "user1");
        assert!(!result.is_read);
    }

    #[tokio::test]
    async fn test_mark_as_read_rejects_other_users() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_notification("n1", "owner", false)]])
                .into_connection(),
        );

        let service = NotificationService::new(NotificationRepository::new(db));
        let result = service.mark_as_read("intruder", "n1").await;

        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_mark_as_read_updates_unread() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_notification("n1", "user1", false)]])
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .into_connection(),
        );

        let service = NotificationService::new(NotificationRepository::new(db));
        service.mark_as_read("user1", "n1").await.unwrap();
    }

    #[tokio::test]
    async fn test_mark_as_read_missing() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<notification::Model>::new()])
                .into_connection(),
        );

        let service = NotificationService::new(NotificationRepository::new(db));
        let result = service.mark_as_read("user1", "n1").await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }
}
