/// Account service: registration, login and credential resolution
///
/// Plaintext passwords enter here and go straight to `auth::password`; they
/// are never stored, compared directly or logged.
///
/// # Example
///
/// ```
/// use tasktrack_shared::services::accounts::{authenticate, register, Registration};
/// use tasktrack_shared::store::memory::MemoryStore;
///
/// # async fn example() -> Result<(), tasktrack_shared::error::ServiceError> {
/// let store = MemoryStore::new();
/// let secret = "test-secret-key-at-least-32-bytes-long";
///
/// let session = register(
///     &store,
///     Registration {
///         username: "jane".to_string(),
///         email: "jane@example.com".to_string(),
///         password: "hunter22".to_string(),
///         role: None,
///     },
///     secret,
/// )
/// .await?;
///
/// let caller = authenticate(&store, &session.token, secret).await?;
/// assert_eq!(caller.user_id, session.account.id);
/// # Ok(())
/// # }
/// ```

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::auth::jwt::{create_token, validate_token, Claims};
use crate::auth::middleware::AuthContext;
use crate::auth::password::{hash_password, verify_against_dummy, verify_password};
use crate::error::{ServiceError, ServiceResult};
use crate::models::user::{AccountSummary, CreateUser, Role, User};
use crate::store::Store;

const INVALID_CREDENTIALS: &str = "Invalid credentials";
const TOKEN_FAILED: &str = "Not authorized, token failed";

/// Registration input
#[derive(Debug, Clone, Deserialize)]
pub struct Registration {
    pub username: String,
    pub email: String,
    pub password: String,

    /// `user` or `manager`; absent or empty means `user`
    pub role: Option<String>,
}

/// Login input, deserialized straight from the request body
///
/// Missing fields read as empty and fail like any other wrong credential.
#[derive(Debug, Clone, Deserialize)]
pub struct Credentials {
    #[serde(default)]
    pub email: String,

    #[serde(default)]
    pub password: String,
}

/// An account together with a freshly issued bearer credential
#[derive(Debug, Clone, Serialize)]
pub struct AuthSession {
    #[serde(flatten)]
    pub account: AccountSummary,

    pub token: String,
}

fn issue_session(user: &User, jwt_secret: &str) -> ServiceResult<AuthSession> {
    let token = create_token(&Claims::new(user.id), jwt_secret)?;

    Ok(AuthSession {
        account: AccountSummary::from(user),
        token,
    })
}

/// Creates an account and signs it in
///
/// # Errors
///
/// - `Validation`: a required field is empty, or the role is unknown
/// - `Conflict`: email or username already registered
pub async fn register(
    store: &dyn Store,
    input: Registration,
    jwt_secret: &str,
) -> ServiceResult<AuthSession> {
    if input.username.is_empty() || input.email.is_empty() || input.password.is_empty() {
        return Err(ServiceError::Validation("Please enter all fields".to_string()));
    }

    let role = match input.role.as_deref() {
        None | Some("") => Role::default(),
        Some(raw) => raw.parse::<Role>().map_err(ServiceError::Validation)?,
    };

    if store.find_account_by_email(&input.email).await?.is_some() {
        debug!(email = %input.email, "Registration rejected: email already registered");
        return Err(ServiceError::Conflict("User already exists".to_string()));
    }

    let password_hash = hash_password(&input.password)?;

    let user = store
        .insert_account(CreateUser {
            username: input.username,
            email: input.email,
            password_hash,
            role,
        })
        .await?;

    info!(user_id = %user.id, role = %user.role, "Account registered");

    issue_session(&user, jwt_secret)
}

/// Verifies an email/password pair and issues a credential
///
/// Unknown email and wrong password fail identically.
pub async fn login(
    store: &dyn Store,
    input: Credentials,
    jwt_secret: &str,
) -> ServiceResult<AuthSession> {
    let unauthenticated = || ServiceError::Unauthenticated(INVALID_CREDENTIALS.to_string());

    let Some(user) = store.find_account_by_email(&input.email).await? else {
        verify_against_dummy(&input.password)?;
        debug!("Login failed");
        return Err(unauthenticated());
    };

    if !verify_password(&input.password, &user.password_hash)? {
        debug!(user_id = %user.id, "Login failed");
        return Err(unauthenticated());
    }

    info!(user_id = %user.id, "Account logged in");

    issue_session(&user, jwt_secret)
}

/// Resolves a bearer credential to the caller's identity
///
/// Expired, malformed and wrongly signed credentials, and credentials naming
/// an account that no longer exists, all yield `Unauthenticated`.
pub async fn authenticate(
    store: &dyn Store,
    token: &str,
    jwt_secret: &str,
) -> ServiceResult<AuthContext> {
    let claims = validate_token(token, jwt_secret).map_err(|e| {
        debug!(error = %e, "Credential rejected");
        ServiceError::Unauthenticated(TOKEN_FAILED.to_string())
    })?;

    match store.find_account_by_id(claims.sub).await? {
        Some(user) => Ok(AuthContext::from_user(&user)),
        None => {
            warn!(user_id = %claims.sub, "Credential names an unknown account");
            Err(ServiceError::Unauthenticated(TOKEN_FAILED.to_string()))
        }
    }
}

/// The caller's own account
pub fn current_account(caller: &AuthContext) -> AccountSummary {
    AccountSummary {
        id: caller.user_id,
        username: caller.username.clone(),
        email: caller.email.clone(),
        role: caller.role,
    }
}
