/// PostgreSQL-backed store
///
/// Thin adapter over the model query methods; all SQL lives in
/// `models::user` and `models::task`.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::{Store, StoreResult};
use crate::auth::authorization::TaskScope;
use crate::db::pool::health_check;
use crate::models::task::{
    CreateTask, OwnerStatusCount, StatusCount, Task, TaskListQuery, TaskWithOwner, UpdateTask,
};
use crate::models::user::{CreateUser, User};

/// Store backed by a PostgreSQL pool
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Store for PgStore {
    async fn insert_account(&self, data: CreateUser) -> StoreResult<User> {
        Ok(User::create(&self.pool, data).await?)
    }

    async fn find_account_by_id(&self, id: Uuid) -> StoreResult<Option<User>> {
        Ok(User::find_by_id(&self.pool, id).await?)
    }

    async fn find_account_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        Ok(User::find_by_email(&self.pool, email).await?)
    }

    async fn list_accounts(&self) -> StoreResult<Vec<User>> {
        Ok(User::list_all(&self.pool).await?)
    }

    async fn insert_task(&self, data: CreateTask) -> StoreResult<Task> {
        Ok(Task::create(&self.pool, data).await?)
    }

    async fn find_task(&self, id: Uuid) -> StoreResult<Option<Task>> {
        Ok(Task::find_by_id(&self.pool, id).await?)
    }

    async fn find_task_with_owner(&self, id: Uuid) -> StoreResult<Option<TaskWithOwner>> {
        Ok(Task::find_with_owner(&self.pool, id).await?)
    }

    async fn update_task(&self, id: Uuid, data: UpdateTask) -> StoreResult<Option<Task>> {
        Ok(Task::update(&self.pool, id, data).await?)
    }

    async fn delete_task(&self, id: Uuid) -> StoreResult<bool> {
        Ok(Task::delete(&self.pool, id).await?)
    }

    async fn query_tasks(&self, query: &TaskListQuery) -> StoreResult<(Vec<TaskWithOwner>, i64)> {
        Ok(Task::list(&self.pool, query).await?)
    }

    async fn count_by_status(&self, scope: &TaskScope) -> StoreResult<Vec<StatusCount>> {
        Ok(Task::count_by_status(&self.pool, scope).await?)
    }

    async fn count_by_owner_and_status(&self) -> StoreResult<Vec<OwnerStatusCount>> {
        Ok(Task::count_by_owner_and_status(&self.pool).await?)
    }

    async fn ping(&self) -> StoreResult<()> {
        Ok(health_check(&self.pool).await?)
    }
}
