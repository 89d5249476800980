//! User model and database operations
//!
//! # Schema
//!
//! ```sql
//! CREATE TABLE users (
//!     id            BIGSERIAL PRIMARY KEY,
//!     email         TEXT NOT NULL,
//!     username      TEXT NOT NULL,
//!     password_hash TEXT NOT NULL,
//!     CONSTRAINT users_email_unique UNIQUE (email)
//! );
//! ```
//!
//! `User` is the stored row and includes the password hash. Anything that
//! leaves the users service is a [`UserProfile`].

use crate::error::{DomainError, DomainResult};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use validator::ValidateEmail;

pub const MAX_EMAIL_LEN: usize = 254;
pub const MAX_USERNAME_LEN: usize = 64;
pub const MIN_PASSWORD_LEN: usize = 6;

/// Stored user row.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct User {
    pub id: i64,

    /// Unique across all users
    pub email: String,

    pub username: String,

    /// Argon2id PHC string, never plaintext
    pub password_hash: String,
}

/// Public view of a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: i64,
    pub email: String,
    pub username: String,
}

impl From<User> for UserProfile {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            username: user.username,
        }
    }
}

/// Input for inserting a user. The password is already hashed.
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub email: String,
    pub username: String,
    pub password_hash: String,
}

/// Full replacement of the mutable user fields. `None` keeps the stored
/// password hash.
#[derive(Debug, Clone)]
pub struct UpdateUser {
    pub email: String,
    pub username: String,
    pub password_hash: Option<String>,
}

/// Normalizes and checks an e-mail address.
///
/// Uses the same HTML5-style rules as the gateway's `#[validate(email)]`.
pub fn validate_email(email: &str) -> DomainResult<String> {
    let email = email.trim();

    if !email.validate_email() {
        return Err(DomainError::validation("email", "must be a valid email address"));
    }
    if email.len() > MAX_EMAIL_LEN {
        return Err(DomainError::validation(
            "email",
            format!("must be at most {MAX_EMAIL_LEN} characters"),
        ));
    }
    Ok(email.to_ascii_lowercase())
}

pub fn validate_username(username: &str) -> DomainResult<String> {
    let username = username.trim();
    if username.is_empty() {
        return Err(DomainError::validation("username", "must not be empty"));
    }
    if username.chars().count() > MAX_USERNAME_LEN {
        return Err(DomainError::validation(
            "username",
            format!("must be at most {MAX_USERNAME_LEN} characters"),
        ));
    }
    Ok(username.to_string())
}

pub fn validate_password(password: &str) -> DomainResult<()> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(DomainError::validation(
            "password",
            format!("must be at least {MIN_PASSWORD_LEN} characters"),
        ));
    }
    Ok(())
}

impl User {
    /// Inserts a user.
    ///
    /// # Errors
    ///
    /// A duplicate e-mail surfaces as a unique violation on
    /// `users_email_unique`.
    pub async fn create(pool: &PgPool, data: &CreateUser) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email, username, password_hash)
            VALUES ($1, $2, $3)
            RETURNING id, email, username, password_hash
            "#,
        )
        .bind(&data.email)
        .bind(&data.username)
        .bind(&data.password_hash)
        .fetch_one(pool)
        .await
    }

    pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, username, password_hash
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// Replaces the mutable fields. Returns `None` if the user is missing.
    pub async fn update(
        pool: &PgPool,
        id: i64,
        data: &UpdateUser,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET email = $2, username = $3, password_hash = COALESCE($4, password_hash)
            WHERE id = $1
            RETURNING id, email, username, password_hash
            "#,
        )
        .bind(id)
        .bind(&data.email)
        .bind(&data.username)
        .bind(&data.password_hash)
        .fetch_optional(pool)
        .await
    }

    /// Deletes a user and, through `ON DELETE CASCADE`, their boards.
    /// Returns false if nothing was deleted.
    pub async fn delete(pool: &PgPool, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_drops_password_hash() {
        let user = User {
            id: 7,
            email: "taskify@example.com".to_string(),
            username: "johnlennon".to_string(),
            password_hash: "$argon2id$...".to_string(),
        };

        let json = serde_json::to_value(UserProfile::from(user)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"id": 7, "email": "taskify@example.com", "username": "johnlennon"})
        );
    }

    #[test]
    fn test_validate_email() {
        assert_eq!(validate_email(" Taskify@Example.com ").unwrap(), "taskify@example.com");
        assert!(validate_email("no-at-sign").is_err());
        assert!(validate_email("@example.com").is_err());
    }

    #[test]
    fn test_malformed_emails_are_rejected() {
        for email in [
            "a@@b.com",
            "has space@x.com",
            "a@b.",
            "a@b.c@d.e",
            "a@x..com",
            "",
        ] {
            assert_eq!(
                validate_email(email),
                Err(DomainError::validation("email", "must be a valid email address")),
                "{email:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_validate_username_and_password() {
        assert_eq!(validate_username("  john ").unwrap(), "john");
        assert_eq!(
            validate_username("   "),
            Err(DomainError::validation("username", "must not be empty"))
        );
        assert!(validate_password("12345").is_err());
        assert!(validate_password("123456").is_ok());
    }
}
