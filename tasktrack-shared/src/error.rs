/// Service-level error type
///
/// Every core operation fails with exactly one [`ServiceError`] kind. Lower
/// layers (store, credentials, policy) have their own error enums; the `From`
/// impls below decide which kind each of those surfaces as.

use crate::auth::authorization::AuthzError;
use crate::auth::jwt::JwtError;
use crate::auth::password::PasswordError;
use crate::store::StoreError;

/// Error returned by the account, task and analytics services
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// Missing, empty or malformed input
    #[error("{0}")]
    Validation(String),

    /// Missing, invalid or expired credential, or failed login
    #[error("{0}")]
    Unauthenticated(String),

    /// Caller is authenticated but may not touch this resource
    #[error("{0}")]
    Forbidden(String),

    /// Referenced resource does not exist
    #[error("{0}")]
    NotFound(String),

    /// Duplicate unique field
    #[error("{0}")]
    Conflict(String),

    /// Store or infrastructure failure
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result alias for service operations
pub type ServiceResult<T> = Result<T, ServiceError>;

impl From<StoreError> for ServiceError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict(msg) => ServiceError::Conflict(msg),
            other => ServiceError::Internal(other.to_string()),
        }
    }
}

impl From<AuthzError> for ServiceError {
    fn from(err: AuthzError) -> Self {
        ServiceError::Forbidden(err.to_string())
    }
}

impl From<PasswordError> for ServiceError {
    fn from(err: PasswordError) -> Self {
        ServiceError::Internal(err.to_string())
    }
}

impl From<JwtError> for ServiceError {
    fn from(err: JwtError) -> Self {
        match err {
            JwtError::CreateError(msg) => ServiceError::Internal(msg),
            _ => ServiceError::Unauthenticated("Not authorized, token failed".to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_conflict_stays_conflict() {
        let err: ServiceError = StoreError::Conflict("Email is already registered".to_string()).into();
        assert!(matches!(err, ServiceError::Conflict(ref m) if m == "Email is already registered"));
    }

    #[test]
    fn test_store_failure_is_internal() {
        let err: ServiceError = StoreError::Internal("boom".to_string()).into();
        assert!(matches!(err, ServiceError::Internal(_)));
    }

    #[test]
    fn test_authz_is_forbidden() {
        let err: ServiceError = AuthzError::NotAuthorized.into();
        assert!(matches!(err, ServiceError::Forbidden(_)));
    }

    #[test]
    fn test_jwt_errors() {
        assert!(matches!(ServiceError::from(JwtError::Expired), ServiceError::Unauthenticated(_)));
        assert!(matches!(
            ServiceError::from(JwtError::ValidationError("bad".to_string())),
            ServiceError::Unauthenticated(_)
        ));
        assert!(matches!(
            ServiceError::from(JwtError::CreateError("bad".to_string())),
            ServiceError::Internal(_)
        ));
    }
}
