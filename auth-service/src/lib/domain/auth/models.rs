use std::fmt;

use chrono::DateTime;
use chrono::Utc;

use crate::domain::session::models::RefreshToken;
use crate::domain::user::models::User;

/// Command to log in.
///
/// Username and password stay raw: a malformed username is reported as bad
/// credentials, never as a validation error.
pub struct LoginCommand {
    pub username: String,
    pub password: String,
    pub previous_refresh_token: Option<RefreshToken>,
}

impl LoginCommand {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            previous_refresh_token: None,
        }
    }

    /// Supersede the session the client held before this login.
    pub fn superseding(mut self, previous: Option<RefreshToken>) -> Self {
        self.previous_refresh_token = previous.filter(|token| !token.is_empty());
        self
    }
}

impl fmt::Debug for LoginCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginCommand")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("previous_refresh_token", &self.previous_refresh_token)
            .finish()
    }
}

/// Access token plus the rotated refresh token.
#[derive(Clone)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: RefreshToken,
    pub refresh_expires_at: DateTime<Utc>,
}

impl fmt::Debug for TokenPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenPair")
            .field("access_token", &"<redacted>")
            .field("refresh_token", &self.refresh_token)
            .field("refresh_expires_at", &self.refresh_expires_at)
            .finish()
    }
}

/// Result of a successful login.
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub user: User,
    pub tokens: TokenPair,
}
