use tonic::Status;

use crate::domain::auth::errors::AuthError;
use crate::domain::user::models::User;

pub mod check_ownership;
pub mod get_user;
pub mod get_usernames;
pub mod login;
pub mod logout;
pub mod refresh_token;
pub mod register;
pub mod validate_token;

impl From<User> for crate::proto::User {
    fn from(user: User) -> Self {
        Self {
            id: user.id.as_i64(),
            username: user.username.as_str().to_string(),
            email: user.email.map(|e| e.as_str().to_string()),
            role: user.role.as_str().to_string(),
            created_at: user.created_at.to_rfc3339(),
        }
    }
}

impl From<AuthError> for Status {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Validation(_) => Status::invalid_argument(err.to_string()),
            AuthError::InvalidCredentials
            | AuthError::InvalidRefreshToken
            | AuthError::RefreshTokenExpired
            | AuthError::Unauthorized(_) => Status::unauthenticated(err.to_string()),
            AuthError::UserExists => Status::already_exists(err.to_string()),
            AuthError::Forbidden => Status::permission_denied(err.to_string()),
            AuthError::NotFound(_) => Status::not_found(err.to_string()),
            AuthError::Timeout { .. } => {
                tracing::error!(error = %err, "Auth operation timed out");
                Status::deadline_exceeded("Store did not respond in time")
            }
            AuthError::Unavailable { .. } => {
                tracing::error!(error = %err, "Auth operation failed");
                Status::unavailable("Service temporarily unavailable")
            }
        }
    }
}
