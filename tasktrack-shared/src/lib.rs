//! # Tasktrack Shared Library
//!
//! Domain types, persistence and core services for the Tasktrack task
//! tracking service. The HTTP layer in `tasktrack-api` is a thin wrapper
//! around the functions in [`services`].
//!
//! ## Module Organization
//!
//! - `models`: Accounts, tasks and pagination types, plus their SQL
//! - `db`: PostgreSQL pool and migrations
//! - `store`: Persistence trait with PostgreSQL and in-memory backends
//! - `auth`: Password hashing, credentials, caller identity, access policy
//! - `services`: Account, task and analytics operations
//! - `error`: Service error type

pub mod auth;
pub mod db;
pub mod error;
pub mod models;
pub mod services;
pub mod store;

/// Current version of the Tasktrack shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
