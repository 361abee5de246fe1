/// Task endpoints
///
/// All handlers require a bearer credential; the caller's identity arrives as
/// an `AuthContext` extension and is handed to the task service unchanged.
/// Extractor rejections are turned into `ApiError::BadRequest` so malformed
/// ids, query strings and bodies still get a JSON error body.
///
/// # Endpoints
///
/// - `GET /api/tasks?status=&search=&sort=field:dir&page=&limit=`
/// - `POST /api/tasks`
/// - `GET /api/tasks/:id`
/// - `PUT /api/tasks/:id`
/// - `DELETE /api/tasks/:id`

use crate::{app::AppState, error::ApiResult};
use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Extension, Json,
};
use serde::Serialize;
use tasktrack_shared::{
    auth::middleware::AuthContext,
    models::{
        page::Page,
        task::{Task, TaskWithOwner},
    },
    services::tasks::{self, NewTask, TaskChanges, TaskFilter},
};
use uuid::Uuid;

/// Body returned by a successful delete
#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub message: String,
}

/// List the tasks visible to the caller
///
/// # Response
///
/// ```json
/// {
///   "docs": [{ "id": "uuid", "title": "...", "owner": { "username": "jane", ... } }],
///   "totalDocs": 25,
///   "limit": 10,
///   "page": 1,
///   "totalPages": 3,
///   "pagingCounter": 1,
///   "hasPrevPage": false,
///   "hasNextPage": true,
///   "prevPage": null,
///   "nextPage": 2
/// }
/// ```
pub async fn list_tasks(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthContext>,
    filter: Result<Query<TaskFilter>, QueryRejection>,
) -> ApiResult<Json<Page<TaskWithOwner>>> {
    let Query(filter) = filter?;
    let page = tasks::list_tasks(
        state.store(),
        &caller,
        &filter,
        state.config.api.max_page_size,
    )
    .await?;

    Ok(Json(page))
}

/// Read one task
pub async fn get_task(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthContext>,
    id: Result<Path<Uuid>, PathRejection>,
) -> ApiResult<Json<TaskWithOwner>> {
    let Path(id) = id?;
    let task = tasks::get_task(state.store(), &caller, id).await?;
    Ok(Json(task))
}

/// Create a task owned by the caller
///
/// ```text
/// POST /api/tasks
/// { "title": "Write report", "description": "Q3 numbers", "status": "pending" }
/// ```
pub async fn create_task(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthContext>,
    input: Result<Json<NewTask>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Task>)> {
    let Json(input) = input?;
    let task = tasks::create_task(state.store(), &caller, input).await?;
    Ok((StatusCode::CREATED, Json(task)))
}

/// Update a task's title, description or status
pub async fn update_task(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthContext>,
    id: Result<Path<Uuid>, PathRejection>,
    changes: Result<Json<TaskChanges>, JsonRejection>,
) -> ApiResult<Json<Task>> {
    let Path(id) = id?;
    let Json(changes) = changes?;
    let task = tasks::update_task(state.store(), &caller, id, changes).await?;
    Ok(Json(task))
}

/// Delete a task
pub async fn delete_task(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthContext>,
    id: Result<Path<Uuid>, PathRejection>,
) -> ApiResult<Json<DeleteResponse>> {
    let Path(id) = id?;
    tasks::delete_task(state.store(), &caller, id).await?;

    Ok(Json(DeleteResponse {
        message: "Task removed".to_string(),
    }))
}
