/// Authentication and authorization
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and verification
/// - [`jwt`]: Bearer credential issuance and validation (1 hour lifetime)
/// - [`middleware`]: Caller identity and bearer header parsing
/// - [`authorization`]: Visibility scopes and per-task access decisions
///
/// # Example
///
/// ```no_run
/// use tasktrack_shared::auth::password::{hash_password, verify_password};
/// use tasktrack_shared::auth::jwt::{create_token, validate_token, Claims};
/// use uuid::Uuid;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hash = hash_password("user_password")?;
/// assert!(verify_password("user_password", &hash)?);
///
/// let token = create_token(&Claims::new(Uuid::new_v4()), "secret-key")?;
/// let claims = validate_token(&token, "secret-key")?;
/// # Ok(())
/// # }
/// ```

pub mod authorization;
pub mod jwt;
pub mod middleware;
pub mod password;
