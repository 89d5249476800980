//! Users use case

use crate::error::{DomainError, DomainResult};
use crate::models::user::{
    validate_email, validate_password, validate_username, CreateUser, UpdateUser, User,
    UserProfile,
};
use crate::password::hash_password;
use async_trait::async_trait;
use sqlx::PgPool;

/// Registration input. `password` is plaintext and is hashed before storage.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub username: String,
    pub password: String,
}

/// Replacement of email and username, optionally with a new password.
#[derive(Debug, Clone)]
pub struct UserChanges {
    pub email: String,
    pub username: String,
    pub password: Option<String>,
}

/// Normalized input ready for hashing and storage.
pub(crate) struct ValidatedUser {
    pub email: String,
    pub username: String,
    pub password: Option<String>,
}

impl NewUser {
    pub(crate) fn validated(self) -> DomainResult<ValidatedUser> {
        validate_password(&self.password)?;
        Ok(ValidatedUser {
            email: validate_email(&self.email)?,
            username: validate_username(&self.username)?,
            password: Some(self.password),
        })
    }
}

impl UserChanges {
    pub(crate) fn validated(self) -> DomainResult<ValidatedUser> {
        if let Some(password) = &self.password {
            validate_password(password)?;
        }
        Ok(ValidatedUser {
            email: validate_email(&self.email)?,
            username: validate_username(&self.username)?,
            password: self.password,
        })
    }
}

#[async_trait]
pub trait UserService: Send + Sync {
    async fn create_user(&self, input: NewUser) -> DomainResult<UserProfile>;

    async fn get_user(&self, id: i64) -> DomainResult<UserProfile>;

    async fn update_user(&self, id: i64, changes: UserChanges) -> DomainResult<UserProfile>;

    async fn delete_user(&self, id: i64) -> DomainResult<()>;
}

/// Argon2 is CPU-bound; keep it off the async workers.
pub(crate) async fn hash_off_thread(password: String) -> DomainResult<String> {
    tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| DomainError::Internal(format!("password hashing task failed: {e}")))?
        .map_err(|e| DomainError::Internal(e.to_string()))
}

#[derive(Debug, Clone)]
pub struct PgUserService {
    pool: PgPool,
}

impl PgUserService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserService for PgUserService {
    async fn create_user(&self, input: NewUser) -> DomainResult<UserProfile> {
        let input = input.validated()?;
        let password_hash = hash_off_thread(input.password.unwrap_or_default()).await?;

        let user = User::create(
            &self.pool,
            &CreateUser {
                email: input.email,
                username: input.username,
                password_hash,
            },
        )
        .await?;

        tracing::info!(user_id = user.id, "user created");
        Ok(user.into())
    }

    async fn get_user(&self, id: i64) -> DomainResult<UserProfile> {
        User::find_by_id(&self.pool, id)
            .await?
            .map(UserProfile::from)
            .ok_or(DomainError::NotFound("user"))
    }

    async fn update_user(&self, id: i64, changes: UserChanges) -> DomainResult<UserProfile> {
        let changes = changes.validated()?;
        let password_hash = match changes.password {
            Some(password) => Some(hash_off_thread(password).await?),
            None => None,
        };

        let user = User::update(
            &self.pool,
            id,
            &UpdateUser {
                email: changes.email,
                username: changes.username,
                password_hash,
            },
        )
        .await?
        .ok_or(DomainError::NotFound("user"))?;

        tracing::info!(user_id = id, "user updated");
        Ok(user.into())
    }

    async fn delete_user(&self, id: i64) -> DomainResult<()> {
        if !User::delete(&self.pool, id).await? {
            return Err(DomainError::NotFound("user"));
        }
        tracing::info!(user_id = id, "user deleted");
        Ok(())
    }
}
