/// Task model and database operations
///
/// This module provides the Task model representing a unit of trackable work.
/// Every task is owned by exactly one account; ownership is fixed at creation.
///
/// # Status
///
/// ```text
/// pending | in-progress | completed
/// ```
///
/// Any status may be set from any other; there is no enforced state machine.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE task_status AS ENUM ('pending', 'in-progress', 'completed');
///
/// CREATE TABLE tasks (
///     id UUID PRIMARY KEY,
///     owner_id UUID NOT NULL REFERENCES users(id),
///     title TEXT NOT NULL,
///     description TEXT NOT NULL,
///     status task_status NOT NULL DEFAULT 'pending',
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use tasktrack_shared::models::task::{CreateTask, Task, TaskStatus};
/// use tasktrack_shared::db::pool::{create_pool, DatabaseConfig};
/// use uuid::Uuid;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let task = Task::create(&pool, CreateTask {
///     owner_id: Uuid::new_v4(),
///     title: "Write report".to_string(),
///     description: "Quarterly numbers".to_string(),
///     status: TaskStatus::Pending,
/// }).await?;
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{PgPool, Postgres, QueryBuilder};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::user::{AccountSummary, Role};
use crate::auth::authorization::TaskScope;

/// Task status
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, sqlx::Type,
)]
#[sqlx(type_name = "task_status", rename_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    /// Not started yet
    Pending,

    /// Being worked on
    InProgress,

    /// Done
    Completed,
}

impl TaskStatus {
    /// All statuses, in storage order
    pub const ALL: [TaskStatus; 3] = [
        TaskStatus::Pending,
        TaskStatus::InProgress,
        TaskStatus::Completed,
    ];

    /// Converts status to its stored string form
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::InProgress => "in-progress",
            TaskStatus::Completed => "completed",
        }
    }
}

impl Default for TaskStatus {
    fn default() -> Self {
        TaskStatus::Pending
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TaskStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| format!("Invalid status: {}", s))
    }
}

/// Task model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Unique task ID
    pub id: Uuid,

    /// Account that created (and owns) the task
    pub owner_id: Uuid,

    /// Short title, never empty
    pub title: String,

    /// Longer description, never empty
    pub description: String,

    /// Current status
    pub status: TaskStatus,

    /// When the task was created
    pub created_at: DateTime<Utc>,

    /// When the task was last updated
    pub updated_at: DateTime<Utc>,
}

/// Task together with a summary of its owner
///
/// Returned by list and single-read operations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskWithOwner {
    #[serde(flatten)]
    pub task: Task,

    pub owner: AccountSummary,
}

/// Input for creating a new task
#[derive(Debug, Clone)]
pub struct CreateTask {
    /// Owner of the task (always the creating account)
    pub owner_id: Uuid,

    /// Task title
    pub title: String,

    /// Task description
    pub description: String,

    /// Initial status
    pub status: TaskStatus,
}

/// Input for updating a task
///
/// Only `Some` fields are written.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateTask {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
}

impl UpdateTask {
    /// Whether no field would change
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none() && self.status.is_none()
    }
}

/// Field a task listing can be sorted by
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskSortField {
    CreatedAt,
    UpdatedAt,
    Title,
    Description,
    Status,
}

impl TaskSortField {
    /// Parses a sort field name as accepted in the `sort` query parameter
    pub fn from_param(name: &str) -> Option<Self> {
        match name {
            "createdAt" | "created_at" => Some(TaskSortField::CreatedAt),
            "updatedAt" | "updated_at" => Some(TaskSortField::UpdatedAt),
            "title" => Some(TaskSortField::Title),
            "description" => Some(TaskSortField::Description),
            "status" => Some(TaskSortField::Status),
            _ => None,
        }
    }

    /// ORDER BY expression; text columns compare bytewise regardless of the
    /// database locale
    fn column(&self) -> &'static str {
        match self {
            TaskSortField::CreatedAt => "t.created_at",
            TaskSortField::UpdatedAt => "t.updated_at",
            TaskSortField::Title => "t.title COLLATE \"C\"",
            TaskSortField::Description => "t.description COLLATE \"C\"",
            TaskSortField::Status => "t.status",
        }
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    fn sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

/// Sort order for task listings
///
/// Ties on the sort field are broken by task id in the same direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskSort {
    pub field: TaskSortField,
    pub direction: SortDirection,
}

impl Default for TaskSort {
    /// Newest first
    fn default() -> Self {
        Self {
            field: TaskSortField::CreatedAt,
            direction: SortDirection::Desc,
        }
    }
}

impl TaskSort {
    /// Parses `field:direction`
    ///
    /// `desc` sorts descending, anything else ascending. An unknown field
    /// yields the default order.
    ///
    /// # Example
    ///
    /// ```
    /// use tasktrack_shared::models::task::{SortDirection, TaskSort, TaskSortField};
    ///
    /// let sort = TaskSort::parse("title:desc");
    /// assert_eq!(sort.field, TaskSortField::Title);
    /// assert_eq!(sort.direction, SortDirection::Desc);
    /// ```
    pub fn parse(raw: &str) -> Self {
        let (field, direction) = raw.split_once(':').unwrap_or((raw, ""));

        match TaskSortField::from_param(field) {
            Some(field) => Self {
                field,
                direction: if direction == "desc" {
                    SortDirection::Desc
                } else {
                    SortDirection::Asc
                },
            },
            None => Self::default(),
        }
    }
}

/// Fully resolved task listing query
///
/// The scope is always present: callers cannot build a listing query without
/// first deciding what the caller is allowed to see.
#[derive(Debug, Clone)]
pub struct TaskListQuery {
    pub scope: TaskScope,
    pub status: Option<TaskStatus>,
    pub search: Option<String>,
    pub sort: TaskSort,
    pub limit: i64,
    pub offset: i64,
}

/// Number of tasks in one status
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::FromRow)]
pub struct StatusCount {
    pub status: TaskStatus,
    pub count: i64,
}

/// Number of tasks one account owns in one status
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::FromRow)]
pub struct OwnerStatusCount {
    pub owner_id: Uuid,
    pub status: TaskStatus,
    pub count: i64,
}

#[derive(sqlx::FromRow)]
struct TaskOwnerRow {
    id: Uuid,
    owner_id: Uuid,
    title: String,
    description: String,
    status: TaskStatus,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    owner_username: String,
    owner_email: String,
    owner_role: Role,
}

impl From<TaskOwnerRow> for TaskWithOwner {
    fn from(row: TaskOwnerRow) -> Self {
        Self {
            owner: AccountSummary {
                id: row.owner_id,
                username: row.owner_username,
                email: row.owner_email,
                role: row.owner_role,
            },
            task: Task {
                id: row.id,
                owner_id: row.owner_id,
                title: row.title,
                description: row.description,
                status: row.status,
                created_at: row.created_at,
                updated_at: row.updated_at,
            },
        }
    }
}

const TASK_COLUMNS: &str = "id, owner_id, title, description, status, created_at, updated_at";

const TASK_WITH_OWNER_SELECT: &str = r#"
    SELECT t.id, t.owner_id, t.title, t.description, t.status, t.created_at, t.updated_at,
           u.username AS owner_username, u.email AS owner_email, u.role AS owner_role
    FROM tasks t
    JOIN users u ON u.id = t.owner_id
"#;

/// Escapes `%`, `_` and `\` so user input matches literally inside ILIKE
pub fn escape_like(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

fn push_filters(qb: &mut QueryBuilder<'_, Postgres>, query: &TaskListQuery) {
    qb.push(" WHERE TRUE");

    if let TaskScope::OwnedBy(owner_id) = query.scope {
        qb.push(" AND t.owner_id = ").push_bind(owner_id);
    }

    if let Some(status) = query.status {
        qb.push(" AND t.status = ").push_bind(status);
    }

    if let Some(search) = &query.search {
        let pattern = format!("%{}%", escape_like(search));
        qb.push(" AND (t.title ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR t.description ILIKE ")
            .push_bind(pattern)
            .push(")");
    }
}

impl Task {
    /// Creates a new task
    pub async fn create(pool: &PgPool, data: CreateTask) -> Result<Self, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(&format!(
            r#"
            INSERT INTO tasks (id, owner_id, title, description, status)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {}
            "#,
            TASK_COLUMNS
        ))
        .bind(Uuid::new_v4())
        .bind(data.owner_id)
        .bind(data.title)
        .bind(data.description)
        .bind(data.status)
        .fetch_one(pool)
        .await?;

        Ok(task)
    }

    /// Finds a task by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(&format!(
            "SELECT {} FROM tasks WHERE id = $1",
            TASK_COLUMNS
        ))
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(task)
    }

    /// Finds a task by ID together with its owner summary
    pub async fn find_with_owner(
        pool: &PgPool,
        id: Uuid,
    ) -> Result<Option<TaskWithOwner>, sqlx::Error> {
        let row = sqlx::query_as::<_, TaskOwnerRow>(&format!(
            "{} WHERE t.id = $1",
            TASK_WITH_OWNER_SELECT
        ))
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(row.map(TaskWithOwner::from))
    }

    /// Updates the given fields of a task
    ///
    /// `updated_at` is always refreshed. Returns None if the task doesn't exist.
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: UpdateTask,
    ) -> Result<Option<Self>, sqlx::Error> {
        let mut qb = QueryBuilder::<Postgres>::new("UPDATE tasks SET updated_at = NOW()");

        if let Some(title) = data.title {
            qb.push(", title = ").push_bind(title);
        }
        if let Some(description) = data.description {
            qb.push(", description = ").push_bind(description);
        }
        if let Some(status) = data.status {
            qb.push(", status = ").push_bind(status);
        }

        qb.push(" WHERE id = ")
            .push_bind(id)
            .push(" RETURNING ")
            .push(TASK_COLUMNS);

        let task = qb.build_query_as::<Task>().fetch_optional(pool).await?;

        Ok(task)
    }

    /// Deletes a task permanently
    ///
    /// Returns false if the task didn't exist.
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Runs a scoped, filtered, sorted and paginated listing
    ///
    /// Returns the tasks on the requested page and the total number of
    /// matching tasks across all pages.
    pub async fn list(
        pool: &PgPool,
        query: &TaskListQuery,
    ) -> Result<(Vec<TaskWithOwner>, i64), sqlx::Error> {
        let mut count_qb = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM tasks t");
        push_filters(&mut count_qb, query);
        let (total,) = count_qb
            .build_query_as::<(i64,)>()
            .fetch_one(pool)
            .await?;

        let mut qb = QueryBuilder::<Postgres>::new(TASK_WITH_OWNER_SELECT);
        push_filters(&mut qb, query);

        let direction = query.sort.direction.sql();
        qb.push(" ORDER BY ")
            .push(query.sort.field.column())
            .push(" ")
            .push(direction)
            .push(", t.id ")
            .push(direction);
        qb.push(" LIMIT ")
            .push_bind(query.limit)
            .push(" OFFSET ")
            .push_bind(query.offset);

        let rows = qb.build_query_as::<TaskOwnerRow>().fetch_all(pool).await?;

        Ok((rows.into_iter().map(TaskWithOwner::from).collect(), total))
    }

    /// Counts tasks per status within a scope
    ///
    /// Statuses with no tasks are absent from the result.
    pub async fn count_by_status(
        pool: &PgPool,
        scope: &TaskScope,
    ) -> Result<Vec<StatusCount>, sqlx::Error> {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT t.status, COUNT(*) AS count FROM tasks t");
        if let TaskScope::OwnedBy(owner_id) = scope {
            qb.push(" WHERE t.owner_id = ").push_bind(*owner_id);
        }
        qb.push(" GROUP BY t.status");

        let counts = qb.build_query_as::<StatusCount>().fetch_all(pool).await?;

        Ok(counts)
    }

    /// Counts tasks per owner and status in a single grouped query
    pub async fn count_by_owner_and_status(
        pool: &PgPool,
    ) -> Result<Vec<OwnerStatusCount>, sqlx::Error> {
        let counts = sqlx::query_as::<_, OwnerStatusCount>(
            r#"
            SELECT owner_id, status, COUNT(*) AS count
            FROM tasks
            GROUP BY owner_id, status
            "#,
        )
        .fetch_all(pool)
        .await?;

        Ok(counts)
    }
}
