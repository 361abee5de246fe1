/// Task service
///
/// Create, read, update, delete and list operations, each taking the caller's
/// identity explicitly. Single-resource operations confirm the task exists,
/// then check access, then validate input, and only then touch the store.
/// Listings have the caller's scope baked into the query before it runs.

use serde::Deserialize;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::auth::authorization::{require_task_access, scope_for};
use crate::auth::middleware::AuthContext;
use crate::error::{ServiceError, ServiceResult};
use crate::models::page::Page;
use crate::models::task::{
    CreateTask, Task, TaskListQuery, TaskSort, TaskStatus, TaskWithOwner, UpdateTask,
};
use crate::store::Store;

/// Page size used when the caller doesn't ask for one
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// Default upper bound on the page size
pub const DEFAULT_MAX_PAGE_SIZE: i64 = 100;

const NOT_FOUND: &str = "Task not found";

/// Raw listing parameters as supplied by a client
///
/// Every field is optional and lenient; see [`list_tasks`] for how each is
/// normalized.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TaskFilter {
    pub status: Option<String>,
    pub search: Option<String>,
    pub sort: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

/// Input for creating a task
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewTask {
    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub description: String,

    pub status: Option<String>,
}

/// Input for updating a task; absent and empty fields are left unchanged
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TaskChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

fn parse_status(raw: &str) -> ServiceResult<TaskStatus> {
    raw.parse::<TaskStatus>().map_err(ServiceError::Validation)
}

async fn load_task(store: &dyn Store, id: Uuid) -> ServiceResult<Task> {
    store
        .find_task(id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(NOT_FOUND.to_string()))
}

fn authorize(caller: &AuthContext, task: &Task, action: &str) -> ServiceResult<()> {
    require_task_access(caller, task.owner_id).map_err(|_| {
        warn!(
            user_id = %caller.user_id,
            task_id = %task.id,
            action,
            "Task access denied"
        );
        ServiceError::Forbidden(format!("Not authorized to {} this task", action))
    })
}

/// Lists the tasks visible to the caller
///
/// - `page < 1` or absent is treated as 1
/// - `limit < 1` or absent is treated as [`DEFAULT_PAGE_SIZE`], and capped at
///   `max_page_size`
/// - an empty `status` or `search` is ignored
/// - a `status` that isn't a valid value matches nothing
/// - `sort` is `field:direction`, see [`TaskSort::parse`]
pub async fn list_tasks(
    store: &dyn Store,
    caller: &AuthContext,
    filter: &TaskFilter,
    max_page_size: i64,
) -> ServiceResult<Page<TaskWithOwner>> {
    let page = filter.page.filter(|p| *p >= 1).unwrap_or(1);
    let limit = filter
        .limit
        .filter(|l| *l >= 1)
        .unwrap_or(DEFAULT_PAGE_SIZE)
        .min(max_page_size.max(1));

    let status = match non_empty(filter.status.as_deref()) {
        None => None,
        Some(raw) => match raw.parse::<TaskStatus>() {
            Ok(status) => Some(status),
            Err(_) => {
                debug!(status = raw, "Unknown status filter, returning empty page");
                return Ok(Page::empty(page, limit));
            }
        },
    };

    let query = TaskListQuery {
        scope: scope_for(caller),
        status,
        search: non_empty(filter.search.as_deref()).map(str::to_string),
        sort: filter
            .sort
            .as_deref()
            .map(TaskSort::parse)
            .unwrap_or_default(),
        limit,
        offset: (page - 1).saturating_mul(limit),
    };

    let (docs, total) = store.query_tasks(&query).await?;

    debug!(
        user_id = %caller.user_id,
        total,
        page,
        limit,
        "Listed tasks"
    );

    Ok(Page::new(docs, total, page, limit))
}

/// Reads one task, with its owner
pub async fn get_task(
    store: &dyn Store,
    caller: &AuthContext,
    id: Uuid,
) -> ServiceResult<TaskWithOwner> {
    let task = store
        .find_task_with_owner(id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(NOT_FOUND.to_string()))?;

    authorize(caller, &task.task, "view")?;

    Ok(task)
}

/// Creates a task owned by the caller
///
/// # Errors
///
/// `Validation` if title or description is empty, or a non-empty status is
/// not a valid value.
pub async fn create_task(
    store: &dyn Store,
    caller: &AuthContext,
    input: NewTask,
) -> ServiceResult<Task> {
    if input.title.is_empty() || input.description.is_empty() {
        return Err(ServiceError::Validation(
            "Please add a title and description".to_string(),
        ));
    }

    let status = match non_empty(input.status.as_deref()) {
        Some(raw) => parse_status(raw)?,
        None => TaskStatus::default(),
    };

    let task = store
        .insert_task(CreateTask {
            owner_id: caller.user_id,
            title: input.title,
            description: input.description,
            status,
        })
        .await?;

    info!(task_id = %task.id, owner_id = %task.owner_id, "Task created");

    Ok(task)
}

/// Applies the non-empty fields of `changes` to a task
pub async fn update_task(
    store: &dyn Store,
    caller: &AuthContext,
    id: Uuid,
    changes: TaskChanges,
) -> ServiceResult<Task> {
    let existing = load_task(store, id).await?;
    authorize(caller, &existing, "update")?;

    let update = UpdateTask {
        title: changes.title.filter(|t| !t.is_empty()),
        description: changes.description.filter(|d| !d.is_empty()),
        status: non_empty(changes.status.as_deref())
            .map(parse_status)
            .transpose()?,
    };

    if update.is_empty() {
        debug!(task_id = %id, "Update carries no changes");
        return Ok(existing);
    }

    let task = store
        .update_task(id, update)
        .await?
        .ok_or_else(|| ServiceError::NotFound(NOT_FOUND.to_string()))?;

    info!(task_id = %task.id, user_id = %caller.user_id, "Task updated");

    Ok(task)
}

/// Permanently deletes a task
pub async fn delete_task(store: &dyn Store, caller: &AuthContext, id: Uuid) -> ServiceResult<()> {
    let existing = load_task(store, id).await?;
    authorize(caller, &existing, "delete")?;

    if !store.delete_task(id).await? {
        return Err(ServiceError::NotFound(NOT_FOUND.to_string()));
    }

    info!(task_id = %id, user_id = %caller.user_id, "Task deleted");

    Ok(())
}
