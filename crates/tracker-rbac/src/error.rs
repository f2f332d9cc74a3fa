//! Error types for caller authorization
//!
//! These errors cover failures while resolving the calling user and their
//! permission level. Denied removals are not errors: they are returned as
//! [`crate::policy::Denial`] values.

use thiserror::Error;

/// Authorization error types.
#[derive(Debug, Error)]
pub enum AuthError {
    /// No user matches the authenticated caller
    #[error("Authentication error: unknown user {0}")]
    UnknownUser(String),

    /// The caller is not authenticated
    #[error("Authentication error: please sign in")]
    Unauthenticated,

    /// The user's account has not been verified
    #[error("Verification error: user {0} has not verified their account")]
    NotVerified(String),

    /// Permission lookup failed in the backing store
    #[error("Permission lookup failed: {0}")]
    Lookup(String),
}

/// Result type for authorization operations.
pub type AuthResult<T> = Result<T, AuthError>;

impl AuthError {
    /// Check if this error should be logged at error level.
    ///
    /// Unknown or unverified callers are expected and not server errors.
    pub fn is_server_error(&self) -> bool {
        matches!(self, AuthError::Lookup(_))
    }

    /// Get HTTP status code for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            AuthError::UnknownUser(_) | AuthError::Unauthenticated => 401,
            AuthError::NotVerified(_) => 403,
            AuthError::Lookup(_) => 500,
        }
    }

    /// Get error code for API responses.
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::UnknownUser(_) => "UNKNOWN_USER",
            AuthError::Unauthenticated => "UNAUTHENTICATED",
            AuthError::NotVerified(_) => "NOT_VERIFIED",
            AuthError::Lookup(_) => "PERMISSION_LOOKUP_FAILED",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(AuthError::Unauthenticated.status_code(), 401);
        assert_eq!(AuthError::NotVerified("1".into()).status_code(), 403);
        assert_eq!(AuthError::Lookup("down".into()).status_code(), 500);
    }

    #[test]
    fn test_server_error_classification() {
        assert!(AuthError::Lookup("down".into()).is_server_error());
        assert!(!AuthError::UnknownUser("1".into()).is_server_error());
    }
}
