/// In-memory store
///
/// Keeps accounts and tasks in process memory behind a `tokio::sync::RwLock`.
/// Listing semantics match the PostgreSQL backend: case-insensitive literal
/// substring search over title and description, sort with an id tie-break in
/// the same direction, then offset/limit.
///
/// Timestamps handed out by this store are strictly increasing, so two tasks
/// created back to back never share a `created_at`.
///
/// # Example
///
/// ```
/// use tasktrack_shared::models::user::{CreateUser, Role};
/// use tasktrack_shared::store::{memory::MemoryStore, Store};
///
/// # async fn example() -> Result<(), tasktrack_shared::store::StoreError> {
/// let store = MemoryStore::new();
/// let user = store
///     .insert_account(CreateUser {
///         username: "jane".to_string(),
///         email: "jane@example.com".to_string(),
///         password_hash: "$argon2id$...".to_string(),
///         role: Role::User,
///     })
///     .await?;
///
/// assert!(store.find_account_by_id(user.id).await?.is_some());
/// # Ok(())
/// # }
/// ```

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{Store, StoreError, StoreResult};
use crate::auth::authorization::TaskScope;
use crate::models::task::{
    CreateTask, OwnerStatusCount, SortDirection, StatusCount, Task, TaskListQuery, TaskSortField,
    TaskStatus, TaskWithOwner, UpdateTask,
};
use crate::models::user::{AccountSummary, CreateUser, User};

#[derive(Debug, Default)]
struct Inner {
    /// Accounts in insertion order
    users: Vec<User>,
    tasks: HashMap<Uuid, Task>,
    last_timestamp: Option<DateTime<Utc>>,
}

impl Inner {
    fn next_timestamp(&mut self) -> DateTime<Utc> {
        let now = Utc::now();
        let ts = match self.last_timestamp {
            Some(last) if now <= last => last + Duration::microseconds(1),
            _ => now,
        };
        self.last_timestamp = Some(ts);
        ts
    }

    fn user(&self, id: Uuid) -> Option<&User> {
        self.users.iter().find(|u| u.id == id)
    }

    fn with_owner(&self, task: &Task) -> Option<TaskWithOwner> {
        self.user(task.owner_id).map(|owner| TaskWithOwner {
            task: task.clone(),
            owner: AccountSummary::from(owner),
        })
    }
}

/// Process-local store; cheap to construct, nothing persists
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn matches_query(task: &Task, query: &TaskListQuery, needle: Option<&str>) -> bool {
    if !query.scope.includes(task.owner_id) {
        return false;
    }

    if let Some(status) = query.status {
        if task.status != status {
            return false;
        }
    }

    match needle {
        Some(needle) => {
            task.title.to_lowercase().contains(needle)
                || task.description.to_lowercase().contains(needle)
        }
        None => true,
    }
}

fn compare_field(a: &Task, b: &Task, field: TaskSortField) -> Ordering {
    match field {
        TaskSortField::CreatedAt => a.created_at.cmp(&b.created_at),
        TaskSortField::UpdatedAt => a.updated_at.cmp(&b.updated_at),
        TaskSortField::Title => a.title.cmp(&b.title),
        TaskSortField::Description => a.description.cmp(&b.description),
        TaskSortField::Status => a.status.cmp(&b.status),
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn insert_account(&self, data: CreateUser) -> StoreResult<User> {
        let mut inner = self.inner.write().await;

        if inner.users.iter().any(|u| u.email == data.email) {
            return Err(StoreError::Conflict("Email is already registered".to_string()));
        }
        if inner.users.iter().any(|u| u.username == data.username) {
            return Err(StoreError::Conflict("Username is already taken".to_string()));
        }

        let now = inner.next_timestamp();
        let user = User {
            id: Uuid::new_v4(),
            username: data.username,
            email: data.email,
            password_hash: data.password_hash,
            role: data.role,
            created_at: now,
            updated_at: now,
        };
        inner.users.push(user.clone());

        Ok(user)
    }

    async fn find_account_by_id(&self, id: Uuid) -> StoreResult<Option<User>> {
        Ok(self.inner.read().await.user(id).cloned())
    }

    async fn find_account_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let inner = self.inner.read().await;
        Ok(inner.users.iter().find(|u| u.email == email).cloned())
    }

    async fn list_accounts(&self) -> StoreResult<Vec<User>> {
        Ok(self.inner.read().await.users.clone())
    }

    async fn insert_task(&self, data: CreateTask) -> StoreResult<Task> {
        let mut inner = self.inner.write().await;

        if inner.user(data.owner_id).is_none() {
            return Err(StoreError::Internal(format!(
                "Owner {} does not exist",
                data.owner_id
            )));
        }

        let now = inner.next_timestamp();
        let task = Task {
            id: Uuid::new_v4(),
            owner_id: data.owner_id,
            title: data.title,
            description: data.description,
            status: data.status,
            created_at: now,
            updated_at: now,
        };
        inner.tasks.insert(task.id, task.clone());

        Ok(task)
    }

    async fn find_task(&self, id: Uuid) -> StoreResult<Option<Task>> {
        Ok(self.inner.read().await.tasks.get(&id).cloned())
    }

    async fn find_task_with_owner(&self, id: Uuid) -> StoreResult<Option<TaskWithOwner>> {
        let inner = self.inner.read().await;
        Ok(inner.tasks.get(&id).and_then(|task| inner.with_owner(task)))
    }

    async fn update_task(&self, id: Uuid, data: UpdateTask) -> StoreResult<Option<Task>> {
        let mut inner = self.inner.write().await;
        if !inner.tasks.contains_key(&id) {
            return Ok(None);
        }

        let now = inner.next_timestamp();
        let Some(task) = inner.tasks.get_mut(&id) else {
            return Ok(None);
        };

        if let Some(title) = data.title {
            task.title = title;
        }
        if let Some(description) = data.description {
            task.description = description;
        }
        if let Some(status) = data.status {
            task.status = status;
        }
        task.updated_at = now;

        Ok(Some(task.clone()))
    }

    async fn delete_task(&self, id: Uuid) -> StoreResult<bool> {
        Ok(self.inner.write().await.tasks.remove(&id).is_some())
    }

    async fn query_tasks(&self, query: &TaskListQuery) -> StoreResult<(Vec<TaskWithOwner>, i64)> {
        let inner = self.inner.read().await;
        let needle = query.search.as_deref().map(str::to_lowercase);

        let mut matching: Vec<&Task> = inner
            .tasks
            .values()
            .filter(|task| matches_query(task, query, needle.as_deref()))
            .collect();

        let field = query.sort.field;
        let direction = query.sort.direction;
        matching.sort_by(|a, b| {
            let ordering = compare_field(a, b, field).then_with(|| a.id.cmp(&b.id));
            match direction {
                SortDirection::Asc => ordering,
                SortDirection::Desc => ordering.reverse(),
            }
        });

        let total = matching.len() as i64;
        let offset = usize::try_from(query.offset).unwrap_or(0);
        let limit = usize::try_from(query.limit).unwrap_or(0);

        let docs = matching
            .into_iter()
            .skip(offset)
            .take(limit)
            .filter_map(|task| inner.with_owner(task))
            .collect();

        Ok((docs, total))
    }

    async fn count_by_status(&self, scope: &TaskScope) -> StoreResult<Vec<StatusCount>> {
        let inner = self.inner.read().await;

        let mut counts: BTreeMap<TaskStatus, i64> = BTreeMap::new();
        for task in inner.tasks.values().filter(|t| scope.includes(t.owner_id)) {
            *counts.entry(task.status).or_insert(0) += 1;
        }

        Ok(counts
            .into_iter()
            .map(|(status, count)| StatusCount { status, count })
            .collect())
    }

    async fn count_by_owner_and_status(&self) -> StoreResult<Vec<OwnerStatusCount>> {
        let inner = self.inner.read().await;

        let mut counts: BTreeMap<(Uuid, TaskStatus), i64> = BTreeMap::new();
        for task in inner.tasks.values() {
            *counts.entry((task.owner_id, task.status)).or_insert(0) += 1;
        }

        Ok(counts
            .into_iter()
            .map(|((owner_id, status), count)| OwnerStatusCount {
                owner_id,
                status,
                count,
            })
            .collect())
    }

    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }
}
