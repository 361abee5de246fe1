/// Caller identity carried through request handling
///
/// After the bearer credential on a request has been validated and resolved
/// to an account, the API layer inserts an `AuthContext` into the request
/// extensions. Every service function receives it as an explicit argument;
/// there is no ambient "current user".
///
/// # Example
///
/// ```
/// use axum::Extension;
/// use tasktrack_shared::auth::middleware::AuthContext;
///
/// async fn handler(Extension(auth): Extension<AuthContext>) -> String {
///     format!("User: {} ({})", auth.username, auth.role)
/// }
/// ```

use axum::http::{header, HeaderMap};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::user::{Role, User};

/// Resolved identity of an authenticated caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthContext {
    /// Authenticated account ID
    pub user_id: Uuid,

    /// Account username
    pub username: String,

    /// Account email
    pub email: String,

    /// Account role, as stored at the time the credential was resolved
    pub role: Role,
}

impl AuthContext {
    pub fn new(
        user_id: Uuid,
        username: impl Into<String>,
        email: impl Into<String>,
        role: Role,
    ) -> Self {
        Self {
            user_id,
            username: username.into(),
            email: email.into(),
            role,
        }
    }

    /// Builds the context from a freshly loaded account
    pub fn from_user(user: &User) -> Self {
        Self::new(user.id, user.username.clone(), user.email.clone(), user.role)
    }

    pub fn is_manager(&self) -> bool {
        self.role.is_manager()
    }
}

/// Extracts the token from an `Authorization: Bearer <token>` header
///
/// Returns None when the header is missing, not valid ASCII, uses another
/// scheme, or carries an empty token.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}
