/// Authentication endpoints
///
/// # Endpoints
///
/// - `POST /api/auth/register` - Create an account and get a credential
/// - `POST /api/auth/login` - Exchange email and password for a credential
/// - `GET /api/auth/me` - The authenticated caller's account

use crate::{app::AppState, error::ApiResult};
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;
use tasktrack_shared::{
    auth::middleware::AuthContext,
    models::user::AccountSummary,
    services::accounts::{self, AuthSession, Credentials, Registration},
};
use validator::Validate;

/// Register request
///
/// Missing fields deserialize as empty so they fail validation with a JSON
/// error body instead of a body-parsing rejection.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "Please enter all fields"))]
    pub username: String,

    #[serde(default)]
    #[validate(
        length(min = 1, message = "Please enter all fields"),
        email(message = "Invalid email format")
    )]
    pub email: String,

    #[serde(default)]
    #[validate(length(min = 1, message = "Please enter all fields"))]
    pub password: String,

    /// `user` or `manager`
    pub role: Option<String>,
}

/// Register a new account
///
/// # Endpoint
///
/// ```text
/// POST /api/auth/register
/// Content-Type: application/json
///
/// {
///   "username": "jane",
///   "email": "jane@example.com",
///   "password": "secret",
///   "role": "user"
/// }
/// ```
///
/// # Response (201)
///
/// ```json
/// {
///   "id": "uuid",
///   "username": "jane",
///   "email": "jane@example.com",
///   "role": "user",
///   "token": "eyJ..."
/// }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Body is not JSON
/// - `422 Unprocessable Entity`: Missing field, bad email, unknown role
/// - `409 Conflict`: Email or username already registered
pub async fn register(
    State(state): State<AppState>,
    req: Result<Json<RegisterRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<AuthSession>)> {
    let Json(req) = req?;
    req.validate()?;

    let session = accounts::register(
        state.store(),
        Registration {
            username: req.username,
            email: req.email,
            password: req.password,
            role: req.role,
        },
        state.jwt_secret(),
    )
    .await?;

    Ok((StatusCode::CREATED, Json(session)))
}

/// Login with email and password
///
/// Same response shape as register. Any failure is
/// `401 {"message": "Invalid credentials"}`.
pub async fn login(
    State(state): State<AppState>,
    credentials: Result<Json<Credentials>, JsonRejection>,
) -> ApiResult<Json<AuthSession>> {
    let Json(credentials) = credentials?;
    let session = accounts::login(state.store(), credentials, state.jwt_secret()).await?;

    Ok(Json(session))
}

/// The authenticated caller's account
pub async fn me(Extension(caller): Extension<AuthContext>) -> Json<AccountSummary> {
    Json(accounts::current_account(&caller))
}
