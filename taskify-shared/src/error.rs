//! Domain error taxonomy
//!
//! `DomainError` is the single source of truth for failure kind. Every
//! transport boundary maps it exactly once: the gRPC services turn it into a
//! `tonic::Status`, the gateway's local-direct path turns it into an HTTP
//! response. No layer downstream of the domain invents new kinds.
//!
//! Storage errors are classified here so that callers never inspect SQLSTATE
//! codes themselves:
//!
//! | sqlx error                        | DomainError        |
//! |-----------------------------------|--------------------|
//! | `RowNotFound`                     | `NotFound`         |
//! | unique violation                  | `AlreadyExists`    |
//! | foreign key violation             | `NotFound(parent)` |
//! | anything else                     | `Internal`         |
//!
//! Position conflicts are the exception: the ordering allocator intercepts
//! them before this conversion runs and retries (see `db::ordering`).

/// Result alias used by use cases and persistence adapters.
pub type DomainResult<T> = Result<T, DomainError>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomainError {
    /// The entity does not exist inside the requested scope.
    ///
    /// A scope mismatch (right id, wrong owner) is reported the same way.
    #[error("{0} not found")]
    NotFound(&'static str),

    /// A uniqueness rule was violated, e.g. a duplicate e-mail.
    #[error("{0}")]
    AlreadyExists(String),

    /// Input rejected before reaching storage.
    #[error("{field}: {reason}")]
    Validation { field: String, reason: String },

    /// The ordering allocator ran out of retries.
    #[error("transient storage error: {0}")]
    TransientStorage(String),

    /// Anything else. The detail is for logs only.
    #[error("internal error: {0}")]
    Internal(String),
}

impl DomainError {
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        DomainError::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Message that is safe to send to a client.
    ///
    /// Internal and transient errors collapse to a fixed string so that no
    /// query text or driver detail crosses a process boundary.
    pub fn public_message(&self) -> String {
        match self {
            DomainError::TransientStorage(_) | DomainError::Internal(_) => {
                "internal error".to_string()
            }
            other => other.to_string(),
        }
    }
}

impl From<sqlx::Error> for DomainError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => DomainError::NotFound("resource"),
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                let message = match db_err.constraint() {
                    Some("users_email_unique") => "user with this email already exists",
                    _ => "resource already exists",
                };
                DomainError::AlreadyExists(message.to_string())
            }
            sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation() => {
                DomainError::NotFound(referenced_entity(db_err.constraint()))
            }
            other => DomainError::Internal(other.to_string()),
        }
    }
}

/// Maps a foreign key constraint to the entity it points at.
///
/// Names follow PostgreSQL's `<table>_<column>_fkey` default.
fn referenced_entity(constraint: Option<&str>) -> &'static str {
    match constraint {
        Some("boards_user_id_fkey") => "user",
        Some("columns_board_id_fkey") => "board",
        Some("tasks_column_id_fkey") => "column",
        Some("tasks_assignee_id_fkey") => "assignee",
        _ => "parent",
    }
}
