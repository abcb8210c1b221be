use serde::Deserialize;
use serde::Serialize;

use crate::access::Role;

/// Audience of access tokens.
pub const ACCESS_AUDIENCE: &str = "forum:access";

/// Audience of refresh tokens. Distinct from [`ACCESS_AUDIENCE`] so one kind
/// of token can never be accepted as the other.
pub const REFRESH_AUDIENCE: &str = "forum:refresh";

/// Claims of a short-lived access token.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AccessClaims {
    /// Numeric user identifier
    pub user_id: i64,

    pub role: Role,

    /// Audience, always [`ACCESS_AUDIENCE`]
    pub aud: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

/// Claims of a refresh token.
///
/// The `jti` makes every refresh token unique even when two are minted for the
/// same user within the same second. Holders never need to decode a refresh
/// token: sessions are looked up by the exact token value.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RefreshClaims {
    pub user_id: i64,

    /// Random token identifier
    pub jti: String,

    /// Audience, always [`REFRESH_AUDIENCE`]
    pub aud: String,

    pub iat: i64,

    pub exp: i64,
}

/// Claims carrying an expiration timestamp.
pub trait Expiring {
    fn expires_at(&self) -> i64;

    /// Check if token is expired.
    fn is_expired(&self, current_timestamp: i64) -> bool {
        self.expires_at() < current_timestamp
    }
}

impl Expiring for AccessClaims {
    fn expires_at(&self) -> i64 {
        self.exp
    }
}

impl Expiring for RefreshClaims {
    fn expires_at(&self) -> i64 {
        self.exp
    }
}
