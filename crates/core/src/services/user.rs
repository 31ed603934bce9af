//! User service.

use letcook_common::{AppError, AppResult};
use letcook_db::{entities::user, repositories::UserRepository};
use sea_orm::{IntoActiveModel, Set};
use serde::Deserialize;
use validator::Validate;

/// Identity asserted by the external identity provider.
#[derive(Debug, Deserialize, Validate)]
pub struct AuthenticateInput {
    #[validate(length(min = 1, max = 128))]
    pub id: String,

    #[validate(length(min = 1, max = 64))]
    pub username: String,

    #[validate(email)]
    pub email: Option<String>,

    #[validate(url, length(max = 1024))]
    pub avatar: Option<String>,
}

/// Partial profile update. Absent fields are left untouched.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateUserInput {
    #[validate(length(min = 1, max = 64))]
    pub username: Option<String>,

    #[validate(email)]
    pub email: Option<String>,

    #[validate(length(max = 1000))]
    pub bio: Option<String>,

    #[validate(length(max = 32))]
    pub phone: Option<String>,

    #[validate(length(max = 512))]
    pub address: Option<String>,

    #[validate(url, length(max = 1024))]
    pub avatar: Option<String>,
}

/// User service for business logic.
#[derive(Clone)]
pub struct UserService {
    user_repo: UserRepository,
}

impl UserService {
    /// Create a new user service.
    #[must_use]
    pub const fn new(user_repo: UserRepository) -> Self {
        Self { user_repo }
    }

    /// Create or refresh the user described by the identity provider.
    ///
    /// Existing users keep their role and profile; email and avatar are
    /// refreshed when the provider supplies them.
    pub async fn authenticate(&self, input: AuthenticateInput) -> AppResult<user::Model> {
        input.validate()?;

        let Some(existing) = self.user_repo.find_by_id(&input.id).await? else {
            tracing::info!(user_id = %input.id, "Registering new user");
            let model = user::ActiveModel {
                id: Set(input.id),
                username: Set(input.username),
                email: Set(input.email),
                bio: Set(None),
                phone: Set(None),
                address: Set(None),
                avatar: Set(input.avatar),
                role: Set(user::UserRole::User),
                created_at: Set(chrono::Utc::now().into()),
                updated_at: Set(None),
            };
            return self.user_repo.create(model).await;
        };

        if input.email.is_none() && input.avatar.is_none() {
            return Ok(existing);
        }

        let mut active = existing.into_active_model();
        if let Some(email) = input.email {
            active.email = Set(Some(email));
        }
        if let Some(avatar) = input.avatar {
            active.avatar = Set(Some(avatar));
        }
        active.updated_at = Set(Some(chrono::Utc::now().into()));

        self.user_repo.update(active).await
    }

    /// Get a user by ID.
    pub async fn get(&self, id: &str) -> AppResult<user::Model> {
        self.user_repo.get_by_id(id).await
    }

    /// List every user.
    pub async fn list_all(&self) -> AppResult<Vec<user::Model>> {
        self.user_repo.find_all().await
    }

    /// Update a profile. Only the user themself or an admin may do this.
    pub async fn update(
        &self,
        actor: &user::Model,
        user_id: &str,
        input: UpdateUserInput,
    ) -> AppResult<user::Model> {
        input.validate()?;

        if actor.id != user_id && !actor.is_admin() {
            return Err(AppError::Forbidden(
                "Cannot update another user's profile".to_string(),
            ));
        }

        let user = self.user_repo.get_by_id(user_id).await?;
        let mut active = user.into_active_model();

        if let Some(username) = input.username {
            active.username = Set(username);
        }
        if let Some(email) = input.email {
            active.email = Set(Some(email));
        }
        if let Some(bio) = input.bio {
            active.bio = Set(Some(bio));
        }
        if let Some(phone) = input.phone {
            active.phone = Set(Some(phone));
        }
        if let Some(address) = input.address {
            active.address = Set(Some(address));
        }
        if let Some(avatar) = input.avatar {
            active.avatar = Set(Some(avatar));
        }
        active.updated_at = Set(Some(chrono::Utc::now().into()));

        self.user_repo.update(active).await
    }
}
