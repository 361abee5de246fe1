/// Core services
///
/// Every function takes the store and, where relevant, the caller's
/// [`AuthContext`](crate::auth::middleware::AuthContext) as explicit
/// arguments.
///
/// - `accounts`: registration, login, credential resolution
/// - `tasks`: scoped task CRUD and listings
/// - `analytics`: per-status dashboards

pub mod accounts;
pub mod analytics;
pub mod tasks;
