/// Data models for Tasktrack
///
/// This module contains the persisted records and their PostgreSQL
/// operations.
///
/// # Models
///
/// - `user`: Accounts, roles and the owner summary attached to tasks
/// - `task`: Tasks, statuses, listing queries and grouped counts
/// - `page`: Paginated result wrapper
///
/// # Example
///
/// ```no_run
/// use tasktrack_shared::models::task::{Task, CreateTask, TaskStatus};
/// use tasktrack_shared::db::pool::{create_pool, DatabaseConfig};
/// use uuid::Uuid;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let task = Task::create(&pool, CreateTask {
///     owner_id: Uuid::new_v4(),
///     title: "Ship it".to_string(),
///     description: "Release 1.0".to_string(),
///     status: TaskStatus::InProgress,
/// }).await?;
/// # Ok(())
/// # }
/// ```

pub mod page;
pub mod task;
pub mod user;
