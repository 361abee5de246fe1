/// Authorization policy
///
/// Pure decision logic with no I/O. Given the caller's resolved identity it
/// answers two questions:
///
/// 1. **Visibility scope** for listings and aggregates: managers see every
///    task, everyone else sees only the tasks they own.
/// 2. **Single-resource access** for read-one, update and delete: allowed if
///    the caller owns the task or is a manager.
///
/// Scopes are applied as query filters before the store is touched, never
/// by post-filtering results.
///
/// # Example
///
/// ```
/// use tasktrack_shared::auth::authorization::{require_task_access, scope_for, TaskScope};
/// use tasktrack_shared::auth::middleware::AuthContext;
/// use tasktrack_shared::models::user::Role;
/// use uuid::Uuid;
///
/// let caller = AuthContext::new(Uuid::new_v4(), "jane", "jane@example.com", Role::User);
///
/// assert_eq!(scope_for(&caller), TaskScope::OwnedBy(caller.user_id));
/// assert!(require_task_access(&caller, caller.user_id).is_ok());
/// assert!(require_task_access(&caller, Uuid::new_v4()).is_err());
/// ```

use uuid::Uuid;

use super::middleware::AuthContext;

/// Error type for authorization checks
#[derive(Debug, thiserror::Error)]
pub enum AuthzError {
    /// Caller neither owns the resource nor is a manager
    #[error("Not authorized to access this resource")]
    NotAuthorized,
}

/// The set of tasks a caller may list or aggregate over
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskScope {
    /// Every task in the system
    All,

    /// Only tasks owned by this account
    OwnedBy(Uuid),
}

impl TaskScope {
    /// Whether a task owned by `owner_id` falls inside this scope
    pub fn includes(&self, owner_id: Uuid) -> bool {
        match self {
            TaskScope::All => true,
            TaskScope::OwnedBy(id) => *id == owner_id,
        }
    }
}

/// Computes the visibility scope for a caller
pub fn scope_for(caller: &AuthContext) -> TaskScope {
    if caller.is_manager() {
        TaskScope::All
    } else {
        TaskScope::OwnedBy(caller.user_id)
    }
}

/// Checks that the caller may read, modify or delete a task
///
/// Allows access if the caller owns the task, or is a manager.
pub fn require_task_access(caller: &AuthContext, owner_id: Uuid) -> Result<(), AuthzError> {
    if caller.user_id == owner_id || caller.is_manager() {
        return Ok(());
    }

    Err(AuthzError::NotAuthorized)
}
