/// Bearer credential issuance and validation
///
/// Credentials are HS256-signed JWTs that encode only the account id. They
/// are valid for exactly one hour from issuance; expiry is checked with no
/// leeway.
///
/// # Claims
///
/// - `sub`: account id
/// - `iss`: always "tasktrack"
/// - `iat` / `nbf`: issuance time (Unix seconds)
/// - `exp`: `iat` + 1 hour
///
/// # Example
///
/// ```
/// use tasktrack_shared::auth::jwt::{create_token, validate_token, Claims};
/// use uuid::Uuid;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let account_id = Uuid::new_v4();
/// let secret = "test-secret-key-at-least-32-bytes-long";
///
/// let token = create_token(&Claims::new(account_id), secret)?;
/// let claims = validate_token(&token, secret)?;
/// assert_eq!(claims.sub, account_id);
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Issuer claim written to and required on every credential
pub const ISSUER: &str = "tasktrack";

/// Lifetime of a credential
pub fn credential_ttl() -> Duration {
    Duration::hours(1)
}

/// Error type for JWT operations
#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    /// Failed to create token
    #[error("Failed to create token: {0}")]
    CreateError(String),

    /// Signature, format or claim check failed
    #[error("Failed to validate token: {0}")]
    ValidationError(String),

    /// Token has expired
    #[error("Token has expired")]
    Expired,

    /// Token was issued by someone else
    #[error("Invalid issuer")]
    InvalidIssuer,
}

/// JWT claims
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject - account ID
    pub sub: Uuid,

    /// Issuer - always "tasktrack"
    pub iss: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// Not before (Unix timestamp)
    pub nbf: i64,
}

impl Claims {
    /// Claims for a credential issued now
    pub fn new(account_id: Uuid) -> Self {
        Self::issued_at(account_id, Utc::now())
    }

    /// Claims for a credential issued at `issued_at`
    ///
    /// # Example
    ///
    /// ```
    /// use tasktrack_shared::auth::jwt::{create_token, validate_token, Claims, JwtError};
    /// use chrono::{Duration, Utc};
    /// use uuid::Uuid;
    ///
    /// let secret = "test-secret-key-at-least-32-bytes-long";
    /// let claims = Claims::issued_at(Uuid::new_v4(), Utc::now() - Duration::hours(2));
    /// let token = create_token(&claims, secret).unwrap();
    /// assert!(matches!(validate_token(&token, secret), Err(JwtError::Expired)));
    /// ```
    pub fn issued_at(account_id: Uuid, issued_at: DateTime<Utc>) -> Self {
        let expiration = issued_at + credential_ttl();

        Self {
            sub: account_id,
            iss: ISSUER.to_string(),
            iat: issued_at.timestamp(),
            exp: expiration.timestamp(),
            nbf: issued_at.timestamp(),
        }
    }
}

/// Signs claims into a JWT string
pub fn create_token(claims: &Claims, secret: &str) -> Result<String, JwtError> {
    let header = Header::new(Algorithm::HS256);
    let key = EncodingKey::from_secret(secret.as_bytes());

    encode(&header, claims, &key)
        .map_err(|e| JwtError::CreateError(format!("Token encoding failed: {}", e)))
}

/// Validates a JWT and extracts its claims
///
/// Verifies signature, issuer, `nbf` and `exp`, all with zero leeway.
pub fn validate_token(token: &str, secret: &str) -> Result<Claims, JwtError> {
    let key = DecodingKey::from_secret(secret.as_bytes());

    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[ISSUER]);
    validation.set_required_spec_claims(&["exp", "iss", "sub"]);
    validation.validate_exp = true;
    validation.validate_nbf = true;
    validation.leeway = 0;

    let token_data = decode::<Claims>(token, &key, &validation).map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::Expired,
        jsonwebtoken::errors::ErrorKind::InvalidIssuer => JwtError::InvalidIssuer,
        _ => JwtError::ValidationError(format!("Token validation failed: {}", e)),
    })?;

    Ok(token_data.claims)
}
