/// Persistence boundary
///
/// Services talk to storage only through the [`Store`] trait, never to a pool
/// directly. Two backends exist:
///
/// - [`postgres::PgStore`]: the production backend, delegating to the query
///   methods on the models
/// - [`memory::MemoryStore`]: a process-local backend used by tests and by
///   `STORAGE_BACKEND=memory` for local development
///
/// Both backends honour the same contract: unique usernames and emails,
/// scoped listings with identical filter, sort, tie-break and pagination
/// semantics, and grouped counts that omit zero buckets.
///
/// # Example
///
/// ```
/// use tasktrack_shared::store::{memory::MemoryStore, Store};
///
/// # async fn example() -> Result<(), tasktrack_shared::store::StoreError> {
/// let store = MemoryStore::new();
/// store.ping().await?;
/// assert!(store.list_accounts().await?.is_empty());
/// # Ok(())
/// # }
/// ```

use async_trait::async_trait;
use uuid::Uuid;

use crate::auth::authorization::TaskScope;
use crate::models::task::{
    CreateTask, OwnerStatusCount, StatusCount, Task, TaskListQuery, TaskWithOwner, UpdateTask,
};
use crate::models::user::{CreateUser, User};

pub mod memory;
pub mod postgres;

/// Error type for store operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A uniqueness rule was violated (duplicate email or username)
    #[error("{0}")]
    Conflict(String),

    /// Underlying database failure
    #[error("Database error: {0}")]
    Database(sqlx::Error),

    /// Any other backend failure
    #[error("Store error: {0}")]
    Internal(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.is_unique_violation() {
                let constraint = db_err.constraint().unwrap_or_default();
                if constraint.contains("email") {
                    return StoreError::Conflict("Email is already registered".to_string());
                }
                if constraint.contains("username") {
                    return StoreError::Conflict("Username is already taken".to_string());
                }
                return StoreError::Conflict("Account already exists".to_string());
            }
        }

        StoreError::Database(err)
    }
}

/// Result alias for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Account and task persistence
#[async_trait]
pub trait Store: Send + Sync {
    /// Inserts a new account
    ///
    /// Fails with [`StoreError::Conflict`] if the email or username is taken.
    async fn insert_account(&self, data: CreateUser) -> StoreResult<User>;

    async fn find_account_by_id(&self, id: Uuid) -> StoreResult<Option<User>>;

    /// Exact, case-sensitive email lookup
    async fn find_account_by_email(&self, email: &str) -> StoreResult<Option<User>>;

    /// Every account, oldest first
    async fn list_accounts(&self) -> StoreResult<Vec<User>>;

    async fn insert_task(&self, data: CreateTask) -> StoreResult<Task>;

    async fn find_task(&self, id: Uuid) -> StoreResult<Option<Task>>;

    async fn find_task_with_owner(&self, id: Uuid) -> StoreResult<Option<TaskWithOwner>>;

    /// Writes the `Some` fields and refreshes `updated_at`
    ///
    /// Returns None if the task doesn't exist.
    async fn update_task(&self, id: Uuid, data: UpdateTask) -> StoreResult<Option<Task>>;

    /// Returns false if the task didn't exist
    async fn delete_task(&self, id: Uuid) -> StoreResult<bool>;

    /// Runs a listing query; returns one page and the total match count
    async fn query_tasks(&self, query: &TaskListQuery) -> StoreResult<(Vec<TaskWithOwner>, i64)>;

    /// Per-status counts within a scope; empty statuses are omitted
    async fn count_by_status(&self, scope: &TaskScope) -> StoreResult<Vec<StatusCount>>;

    /// Per-owner, per-status counts over every task; empty buckets are omitted
    async fn count_by_owner_and_status(&self) -> StoreResult<Vec<OwnerStatusCount>>;

    /// Verifies the backend is reachable
    async fn ping(&self) -> StoreResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_error_display() {
        let err = StoreError::Conflict("Email is already registered".to_string());
        assert_eq!(err.to_string(), "Email is already registered");

        let err = StoreError::Internal("poisoned".to_string());
        assert_eq!(err.to_string(), "Store error: poisoned");
    }

    #[test]
    fn test_non_unique_sqlx_error_maps_to_database() {
        let err: StoreError = sqlx::Error::RowNotFound.into();
        assert!(matches!(err, StoreError::Database(_)));
    }
}
