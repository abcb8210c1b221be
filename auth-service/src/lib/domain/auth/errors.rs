use thiserror::Error;

use crate::domain::errors::StoreError;
use crate::domain::user::errors::RegistrationInputError;

/// Why an access token was not accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenRejection {
    Missing,
    Invalid,
    Expired,
}

impl TokenRejection {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenRejection::Missing => "missing",
            TokenRejection::Invalid => "invalid",
            TokenRejection::Expired => "expired",
        }
    }
}

/// Error for authentication and session operations.
///
/// Callers branch on the variant, never on the message. `Unavailable` keeps
/// its cause for logs; transports must not forward it to clients.
#[derive(Debug, Clone, Error)]
pub enum AuthError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("User already exists")]
    UserExists,

    #[error("Invalid refresh token")]
    InvalidRefreshToken,

    #[error("Refresh token expired")]
    RefreshTokenExpired,

    #[error("Unauthorized: {} access token", .0.as_str())]
    Unauthorized(TokenRejection),

    #[error("Forbidden")]
    Forbidden,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Store operation timed out: {operation}")]
    Timeout { operation: &'static str },

    #[error("Service unavailable during {operation}: {cause}")]
    Unavailable {
        operation: &'static str,
        cause: String,
    },
}

impl AuthError {
    /// Map a store failure that has no domain meaning of its own.
    pub fn store(operation: &'static str, error: StoreError) -> Self {
        match error {
            StoreError::Timeout => AuthError::Timeout { operation },
            other => AuthError::Unavailable {
                operation,
                cause: other.to_string(),
            },
        }
    }

    /// Timeouts and unavailability are transient; every other kind is a
    /// definitive answer.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            AuthError::Timeout { .. } | AuthError::Unavailable { .. }
        )
    }
}

impl From<RegistrationInputError> for AuthError {
    fn from(error: RegistrationInputError) -> Self {
        AuthError::Validation(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_timeout_is_retryable() {
        let error = AuthError::store("find_session", StoreError::Timeout);

        assert!(matches!(
            error,
            AuthError::Timeout {
                operation: "find_session"
            }
        ));
        assert!(error.is_retryable());
    }

    #[test]
    fn test_database_error_is_unavailable() {
        let error = AuthError::store(
            "create_user",
            StoreError::Database("connection reset".to_string()),
        );

        assert!(matches!(error, AuthError::Unavailable { .. }));
        assert!(error.is_retryable());
    }

    #[test]
    fn test_authentication_failures_are_not_retryable() {
        assert!(!AuthError::InvalidCredentials.is_retryable());
        assert!(!AuthError::InvalidRefreshToken.is_retryable());
        assert!(!AuthError::Unauthorized(TokenRejection::Expired).is_retryable());
    }

    #[test]
    fn test_unauthorized_message_names_reason() {
        assert_eq!(
            AuthError::Unauthorized(TokenRejection::Expired).to_string(),
            "Unauthorized: expired access token"
        );
    }
}
