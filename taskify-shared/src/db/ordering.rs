//! Ordering allocator
//!
//! Boards, columns and tasks carry a server-assigned `position`: 1-based,
//! unique within a scope (owner for boards, board for columns, column for
//! tasks), never supplied by the client, never renumbered.
//!
//! # Allocation
//!
//! Each attempt runs in its own transaction:
//!
//! ```text
//! BEGIN
//! SELECT pg_advisory_xact_lock(<scope class>, <scope key>)
//! INSERT INTO <table> (...)
//!     SELECT ..., COALESCE(MAX(position), 0) + 1 FROM <table> WHERE <scope> = $1
//!     RETURNING ...
//! COMMIT
//! ```
//!
//! The advisory lock serializes creates within one scope, so the MAX read and
//! the insert behave as one indivisible step. The `(scope, position)` unique
//! constraint stays the backstop: a violation of that constraint rolls the
//! attempt back and starts a new one, up to `max_attempts`, after which the
//! caller gets [`DomainError::TransientStorage`].
//!
//! Deletes do not go through the allocator. Gaps left by deleted rows are
//! permanent because the next position is derived from MAX, not COUNT. Only
//! a deleted highest position can come back, on the next create.

use crate::error::{DomainError, DomainResult};
use sqlx::{
    postgres::{PgArguments, PgRow},
    query::QueryAs,
    FromRow, PgPool, Postgres,
};
use std::future::Future;
use tracing::{debug, warn};

/// Attempts per create before giving up with a transient error.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;

/// Parent boundary inside which positions are unique.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderingScope {
    BoardsByOwner,
    ColumnsByBoard,
    TasksByColumn,
}

impl OrderingScope {
    pub fn table(self) -> &'static str {
        match self {
            OrderingScope::BoardsByOwner => "boards",
            OrderingScope::ColumnsByBoard => "columns",
            OrderingScope::TasksByColumn => "tasks",
        }
    }

    /// Name of the `(scope, position)` unique constraint in the migrations.
    pub fn position_constraint(self) -> &'static str {
        match self {
            OrderingScope::BoardsByOwner => "boards_owner_position_unique",
            OrderingScope::ColumnsByBoard => "columns_board_position_unique",
            OrderingScope::TasksByColumn => "tasks_column_position_unique",
        }
    }

    /// First key of the two-key advisory lock; keeps scopes of different
    /// tables from contending with each other.
    fn lock_class(self) -> i32 {
        match self {
            OrderingScope::BoardsByOwner => 0x7461_0001,
            OrderingScope::ColumnsByBoard => 0x7461_0002,
            OrderingScope::TasksByColumn => 0x7461_0003,
        }
    }
}

/// Second key of the advisory lock. Folds the 64-bit scope id into 32 bits;
/// two scopes that fold to the same key only serialize against each other.
fn lock_key(scope_id: i64) -> i32 {
    (scope_id ^ (scope_id >> 32)) as i32
}

/// A new row whose position is allocated on insert.
///
/// `insert_query` must be a single `INSERT ... SELECT` that computes
/// `COALESCE(MAX(position), 0) + 1` over the rows of the same scope and
/// returns the full row.
pub trait PositionedInsert: Sync {
    type Output: for<'r> FromRow<'r, PgRow> + Send + Unpin;

    const SCOPE: OrderingScope;

    /// Value of the scope column (owner id, board id or column id).
    fn scope_id(&self) -> i64;

    fn insert_query(&self) -> QueryAs<'_, Postgres, Self::Output, PgArguments>;
}

/// Allocates positions atomically with retries on position conflicts.
#[derive(Debug, Clone, Copy)]
pub struct OrderingAllocator {
    max_attempts: u32,
}

impl OrderingAllocator {
    /// `max_attempts` is clamped to at least one.
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Inserts `row` at the next free position of its scope and returns the
    /// persisted entity.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the parent referenced by the scope column is missing
    /// - `AlreadyExists` for unique violations other than the position one
    /// - `TransientStorage` once every attempt hit a position conflict
    /// - `Internal` for any other storage failure
    pub async fn insert<R: PositionedInsert>(
        &self,
        pool: &PgPool,
        row: &R,
    ) -> DomainResult<R::Output> {
        retry_on_conflict(R::SCOPE, self.max_attempts, |_| try_insert(pool, row)).await
    }
}

impl Default for OrderingAllocator {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ATTEMPTS)
    }
}

/// Outcome of a failed attempt.
#[derive(Debug)]
enum InsertError {
    /// The `(scope, position)` constraint fired; worth another attempt.
    PositionConflict,
    Failed(DomainError),
}

impl InsertError {
    fn classify(err: sqlx::Error, scope: OrderingScope) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.is_unique_violation()
                && db_err.constraint() == Some(scope.position_constraint())
            {
                return InsertError::PositionConflict;
            }
        }
        InsertError::Failed(err.into())
    }
}

async fn try_insert<R: PositionedInsert>(
    pool: &PgPool,
    row: &R,
) -> Result<R::Output, InsertError> {
    let classify = |err| InsertError::classify(err, R::SCOPE);

    // Dropping `tx` on any early return rolls the attempt back.
    let mut tx = pool.begin().await.map_err(classify)?;

    sqlx::query("SELECT pg_advisory_xact_lock($1, $2)")
        .bind(R::SCOPE.lock_class())
        .bind(lock_key(row.scope_id()))
        .execute(&mut *tx)
        .await
        .map_err(classify)?;

    let created = row
        .insert_query()
        .fetch_one(&mut *tx)
        .await
        .map_err(classify)?;

    tx.commit().await.map_err(classify)?;

    Ok(created)
}

async fn retry_on_conflict<T, F, Fut>(
    scope: OrderingScope,
    max_attempts: u32,
    mut attempt: F,
) -> DomainResult<T>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, InsertError>>,
{
    for n in 1..=max_attempts {
        match attempt(n).await {
            Ok(created) => {
                if n > 1 {
                    debug!(table = scope.table(), attempt = n, "position allocated after retry");
                }
                return Ok(created);
            }
            Err(InsertError::PositionConflict) => {
                warn!(
                    table = scope.table(),
                    attempt = n,
                    max_attempts,
                    "position conflict, retrying allocation"
                );
            }
            Err(InsertError::Failed(err)) => return Err(err),
        }
    }

    Err(DomainError::TransientStorage(format!(
        "{} position still conflicting after {max_attempts} attempts",
        scope.table()
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[tokio::test]
    async fn test_retry_succeeds_after_conflicts() {
        let calls = AtomicU32::new(0);

        let result = retry_on_conflict(OrderingScope::BoardsByOwner, 5, |n| {
            calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if n < 3 {
                    Err(InsertError::PositionConflict)
                } else {
                    Ok(n)
                }
            }
        })
        .await;

        assert_eq!(result, Ok(3));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_retry_exhaustion_is_transient() {
        let calls = AtomicU32::new(0);

        let result: DomainResult<()> = retry_on_conflict(OrderingScope::ColumnsByBoard, 4, |_| {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(InsertError::PositionConflict) }
        })
        .await;

        assert!(matches!(result, Err(DomainError::TransientStorage(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn test_other_failures_are_not_retried() {
        let calls = AtomicU32::new(0);

        let result: DomainResult<()> = retry_on_conflict(OrderingScope::TasksByColumn, 5, |_| {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(InsertError::Failed(DomainError::NotFound("column"))) }
        })
        .await;

        assert_eq!(result, Err(DomainError::NotFound("column")));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_max_attempts_is_at_least_one() {
        assert_eq!(OrderingAllocator::new(0).max_attempts(), 1);
        assert_eq!(OrderingAllocator::default().max_attempts(), DEFAULT_MAX_ATTEMPTS);
    }

    #[test]
    fn test_lock_key_folds_high_bits() {
        assert_eq!(lock_key(2), 2);
        assert_ne!(lock_key(1 << 32), lock_key(0));
    }

    #[test]
    fn test_lock_classes_are_distinct() {
        let classes = [
            OrderingScope::BoardsByOwner.lock_class(),
            OrderingScope::ColumnsByBoard.lock_class(),
            OrderingScope::TasksByColumn.lock_class(),
        ];
        assert_ne!(classes[0], classes[1]);
        assert_ne!(classes[1], classes[2]);
        assert_ne!(classes[0], classes[2]);
    }
}
