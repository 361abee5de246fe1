/// API route handlers
///
/// This module contains all route handlers organized by resource:
///
/// - `health`: Banner and health check endpoints
/// - `auth`: Registration, login and current account
/// - `tasks`: Task CRUD and listings
/// - `dashboard`: Task analytics

pub mod auth;
pub mod dashboard;
pub mod health;
pub mod tasks;
