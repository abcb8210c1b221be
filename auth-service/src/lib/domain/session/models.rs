use std::fmt;

use chrono::DateTime;
use chrono::Utc;

use crate::domain::user::models::UserId;

/// Session unique identifier type, assigned by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(pub i64);

impl SessionId {
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Opaque refresh token value.
///
/// It is a bearer credential, so `Debug` prints only its length.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct RefreshToken(String);

impl RefreshToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for RefreshToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RefreshToken(<redacted, {} bytes>)", self.0.len())
    }
}

/// A login on one client, keyed by its current refresh token.
///
/// Rotation mutates `refresh_token` and `expires_at` of the same row.
#[derive(Debug, Clone)]
pub struct Session {
    pub id: SessionId,
    pub user_id: UserId,
    pub refresh_token: RefreshToken,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl Session {
    /// A session is expired strictly after its expiry instant.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }
}

/// Session record before the store has assigned an identifier.
#[derive(Debug, Clone)]
pub struct NewSession {
    pub user_id: UserId,
    pub refresh_token: RefreshToken,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl NewSession {
    pub fn with_id(self, id: SessionId) -> Session {
        Session {
            id,
            user_id: self.user_id,
            refresh_token: self.refresh_token,
            expires_at: self.expires_at,
            created_at: self.created_at,
        }
    }
}
