//! Shared helpers for tasktrack-shared integration tests

#![allow(dead_code)]

use std::env;
use tasktrack_shared::auth::middleware::AuthContext;
use tasktrack_shared::db::migrations::{ensure_database_exists, run_migrations};
use tasktrack_shared::db::pool::{create_pool, DatabaseConfig};
use tasktrack_shared::models::user::{CreateUser, Role};
use tasktrack_shared::services::tasks::{create_task, NewTask};
use tasktrack_shared::models::task::Task;
use tasktrack_shared::store::postgres::PgStore;
use tasktrack_shared::store::Store;
use uuid::Uuid;

pub const JWT_SECRET: &str = "test-secret-key-at-least-32-bytes-long";

/// Inserts an account directly (skipping password hashing) and returns its
/// caller identity
///
/// Names get a random suffix so the helper is safe against a shared database.
pub async fn account(store: &dyn Store, name: &str, role: Role) -> AuthContext {
    let suffix = Uuid::new_v4().simple().to_string();
    let username = format!("{}-{}", name, &suffix[..8]);

    let user = store
        .insert_account(CreateUser {
            email: format!("{}@example.com", username),
            username,
            password_hash: "not-a-real-hash".to_string(),
            role,
        })
        .await
        .expect("Failed to insert account");

    AuthContext::from_user(&user)
}

/// Creates a task through the service layer
pub async fn task(store: &dyn Store, owner: &AuthContext, title: &str, status: &str) -> Task {
    create_task(
        store,
        owner,
        NewTask {
            title: title.to_string(),
            description: format!("{} description", title),
            status: Some(status.to_string()),
        },
    )
    .await
    .expect("Failed to create task")
}

/// Connects to `DATABASE_URL` and migrates it, or returns None when unset
pub async fn pg_store() -> Option<PgStore> {
    let Ok(url) = env::var("DATABASE_URL") else {
        eprintln!("DATABASE_URL not set, skipping PostgreSQL test");
        return None;
    };

    ensure_database_exists(&url)
        .await
        .expect("Failed to create database");

    let pool = create_pool(DatabaseConfig {
        url,
        max_connections: 5,
        ..Default::default()
    })
    .await
    .expect("Failed to create pool");

    run_migrations(&pool).await.expect("Failed to run migrations");

    Some(PgStore::new(pool))
}
