/// End-to-end checks of ownership scoping, manager visibility, pagination
/// and analytics through the service layer, backed by the in-memory store

mod common;

use common::{account, task, JWT_SECRET};
use tasktrack_shared::error::ServiceError;
use tasktrack_shared::models::task::TaskStatus;
use tasktrack_shared::models::user::Role;
use tasktrack_shared::services::accounts::{self, Registration};
use tasktrack_shared::services::analytics::get_analytics;
use tasktrack_shared::services::tasks::{
    delete_task, get_task, list_tasks, update_task, TaskChanges, TaskFilter, DEFAULT_MAX_PAGE_SIZE,
};
use tasktrack_shared::store::memory::MemoryStore;

#[tokio::test]
async fn test_users_never_see_each_others_tasks() {
    let store = MemoryStore::new();
    let alice = account(&store, "alice", Role::User).await;
    let bob = account(&store, "bob", Role::User).await;

    let bobs = task(&store, &bob, "Bob's task", "pending").await;
    task(&store, &alice, "Alice's task", "pending").await;

    let page = list_tasks(&store, &alice, &TaskFilter::default(), DEFAULT_MAX_PAGE_SIZE)
        .await
        .unwrap();
    assert_eq!(page.total_docs, 1);
    assert!(page.docs.iter().all(|t| t.task.owner_id == alice.user_id));

    let err = get_task(&store, &alice, bobs.id).await.unwrap_err();
    assert!(matches!(err, ServiceError::Forbidden(_)));

    let err = delete_task(&store, &alice, bobs.id).await.unwrap_err();
    assert!(matches!(err, ServiceError::Forbidden(_)));
    assert!(get_task(&store, &bob, bobs.id).await.is_ok());
}

#[tokio::test]
async fn test_manager_sees_and_edits_everything() {
    let store = MemoryStore::new();
    let manager = account(&store, "boss", Role::Manager).await;
    let alice = account(&store, "alice", Role::User).await;
    let bob = account(&store, "bob", Role::User).await;

    let a = task(&store, &alice, "A", "pending").await;
    let b = task(&store, &bob, "B", "in-progress").await;

    let page = list_tasks(&store, &manager, &TaskFilter::default(), DEFAULT_MAX_PAGE_SIZE)
        .await
        .unwrap();
    let ids: Vec<_> = page.docs.iter().map(|t| t.task.id).collect();
    assert!(ids.contains(&a.id));
    assert!(ids.contains(&b.id));

    let updated = update_task(
        &store,
        &manager,
        a.id,
        TaskChanges {
            status: Some("completed".to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(updated.status, TaskStatus::Completed);
    assert_eq!(updated.owner_id, alice.user_id);

    delete_task(&store, &manager, b.id).await.unwrap();
    assert!(matches!(
        get_task(&store, &bob, b.id).await,
        Err(ServiceError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_create_then_read_round_trip() {
    let store = MemoryStore::new();
    let user = account(&store, "jane", Role::User).await;

    let created = task(&store, &user, "T", "").await;
    let fetched = get_task(&store, &user, created.id).await.unwrap();

    assert_eq!(fetched.task.title, "T");
    assert_eq!(fetched.task.description, "T description");
    assert_eq!(fetched.task.status, TaskStatus::Pending);
    assert_eq!(fetched.task.owner_id, user.user_id);
    assert_eq!(fetched.owner.id, user.user_id);
    assert_eq!(fetched.owner.username, user.username);
}

#[tokio::test]
async fn test_partial_update_preserves_other_fields() {
    let store = MemoryStore::new();
    let user = account(&store, "jane", Role::User).await;
    let created = task(&store, &user, "A", "pending").await;

    let updated = update_task(
        &store,
        &user,
        created.id,
        TaskChanges {
            status: Some("completed".to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    assert_eq!(updated.title, "A");
    assert_eq!(updated.description, "A description");
    assert_eq!(updated.status, TaskStatus::Completed);
    assert_eq!(updated.created_at, created.created_at);
}

#[tokio::test]
async fn test_pagination_over_twenty_five_tasks() {
    let store = MemoryStore::new();
    let user = account(&store, "jane", Role::User).await;
    for i in 0..25 {
        task(&store, &user, &format!("Task {:02}", i), "pending").await;
    }

    let mut seen = std::collections::HashSet::new();
    for (page_no, expected) in [(1, 10), (2, 10), (3, 5)] {
        let filter = TaskFilter {
            page: Some(page_no),
            limit: Some(10),
            ..Default::default()
        };
        let page = list_tasks(&store, &user, &filter, DEFAULT_MAX_PAGE_SIZE).await.unwrap();

        assert_eq!(page.docs.len(), expected);
        assert_eq!(page.total_docs, 25);
        assert_eq!(page.total_pages, 3);
        for doc in &page.docs {
            assert!(seen.insert(doc.task.id), "task appeared on two pages");
        }
    }
    assert_eq!(seen.len(), 25);
}

#[tokio::test]
async fn test_search_and_status_filters_combine() {
    let store = MemoryStore::new();
    let user = account(&store, "jane", Role::User).await;
    task(&store, &user, "Write REPORT", "pending").await;
    task(&store, &user, "Read report", "completed").await;
    task(&store, &user, "Groceries", "pending").await;

    let filter = TaskFilter {
        search: Some("report".to_string()),
        status: Some("pending".to_string()),
        ..Default::default()
    };
    let page = list_tasks(&store, &user, &filter, DEFAULT_MAX_PAGE_SIZE).await.unwrap();
    assert_eq!(page.total_docs, 1);
    assert_eq!(page.docs[0].task.title, "Write REPORT");

    let filter = TaskFilter {
        sort: Some("title:asc".to_string()),
        ..Default::default()
    };
    let page = list_tasks(&store, &user, &filter, DEFAULT_MAX_PAGE_SIZE).await.unwrap();
    let titles: Vec<_> = page.docs.iter().map(|t| t.task.title.as_str()).collect();
    assert_eq!(titles, vec!["Groceries", "Read report", "Write REPORT"]);
}

#[tokio::test]
async fn test_analytics_totals_are_consistent() {
    let store = MemoryStore::new();
    let user = account(&store, "jane", Role::User).await;
    let other = account(&store, "john", Role::User).await;
    let manager = account(&store, "boss", Role::Manager).await;

    for _ in 0..2 {
        task(&store, &user, "p", "pending").await;
    }
    for _ in 0..3 {
        task(&store, &user, "c", "completed").await;
    }
    task(&store, &other, "x", "in-progress").await;

    let report = get_analytics(&store, &user).await.unwrap();
    assert_eq!(report.total_tasks, 5);
    assert_eq!(report.tasks_by_status.len(), 2);
    assert_eq!(report.tasks_by_status[&TaskStatus::Pending], 2);
    assert_eq!(report.tasks_by_status[&TaskStatus::Completed], 3);
    assert!(!report.tasks_by_status.contains_key(&TaskStatus::InProgress));

    let report = get_analytics(&store, &manager).await.unwrap();
    assert_eq!(report.total_tasks, 6);
    let per_user = report.all_users_stats.unwrap();
    assert_eq!(per_user[&user.username].total_tasks, 5);
    assert_eq!(per_user[&other.username].total_tasks, 1);
    assert_eq!(per_user[&manager.username].total_tasks, 0);
}

#[tokio::test]
async fn test_duplicate_registration_conflicts() {
    let store = MemoryStore::new();
    let input = Registration {
        username: "jane".to_string(),
        email: "jane@example.com".to_string(),
        password: "password123".to_string(),
        role: None,
    };

    let first = accounts::register(&store, input.clone(), JWT_SECRET).await.unwrap();

    let mut again = input;
    again.username = "jane2".to_string();
    let err = accounts::register(&store, again, JWT_SECRET).await.unwrap_err();
    assert!(matches!(err, ServiceError::Conflict(_)));

    // First account still works
    let caller = accounts::authenticate(&store, &first.token, JWT_SECRET).await.unwrap();
    assert_eq!(caller.user_id, first.account.id);
    assert_eq!(store_accounts(&store).await, 1);
}

async fn store_accounts(store: &MemoryStore) -> usize {
    use tasktrack_shared::store::Store;
    store.list_accounts().await.unwrap().len()
}

#[tokio::test]
async fn test_credential_lifetime() {
    use chrono::{Duration, Utc};
    use tasktrack_shared::auth::jwt::{create_token, Claims};

    let store = MemoryStore::new();
    let user = account(&store, "jane", Role::User).await;

    let fresh = Claims::issued_at(user.user_id, Utc::now() - Duration::minutes(30));
    let token = create_token(&fresh, JWT_SECRET).unwrap();
    let caller = accounts::authenticate(&store, &token, JWT_SECRET).await.unwrap();
    assert_eq!(caller.user_id, user.user_id);

    let stale = Claims::issued_at(user.user_id, Utc::now() - Duration::minutes(61));
    let token = create_token(&stale, JWT_SECRET).unwrap();
    let err = accounts::authenticate(&store, &token, JWT_SECRET).await.unwrap_err();
    assert!(matches!(err, ServiceError::Unauthenticated(_)));
}
