use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;

use crate::domain::errors::StoreError;
use crate::domain::session::models::NewSession;
use crate::domain::session::models::RefreshToken;
use crate::domain::session::models::Session;
use crate::domain::session::models::SessionId;

/// Persistence operations for sessions.
#[async_trait]
pub trait SessionRepository: Send + Sync + 'static {
    /// Persist a new session row.
    ///
    /// # Errors
    /// * `UniqueViolation` - Refresh token value already stored
    /// * `Database` - Database operation failed
    async fn create(&self, session: NewSession) -> Result<Session, StoreError>;

    /// Retrieve the session currently holding a refresh token value.
    ///
    /// # Returns
    /// Optional session (None if no row holds this value)
    async fn find_by_refresh_token(
        &self,
        token: &RefreshToken,
    ) -> Result<Option<Session>, StoreError>;

    /// Rotate a session's refresh token.
    ///
    /// Compare-and-swap: the row is only updated while it still holds
    /// `current`. Of two concurrent callers presenting the same value,
    /// exactly one observes `true`.
    ///
    /// # Arguments
    /// * `id` - Session to rotate
    /// * `current` - Value the caller presented
    /// * `replacement` - New refresh token value
    /// * `expires_at` - New expiry
    ///
    /// # Returns
    /// `true` if one row was updated, `false` if the row is gone or was
    /// already rotated
    async fn replace(
        &self,
        id: SessionId,
        current: &RefreshToken,
        replacement: &RefreshToken,
        expires_at: DateTime<Utc>,
    ) -> Result<bool, StoreError>;

    /// Remove a session.
    ///
    /// # Returns
    /// `true` if a row was deleted
    async fn delete(&self, id: SessionId) -> Result<bool, StoreError>;

    /// Remove every session that expired before `now`.
    ///
    /// # Returns
    /// Number of rows deleted
    async fn delete_expired(&self, now: DateTime<Utc>) -> Result<u64, StoreError>;
}
