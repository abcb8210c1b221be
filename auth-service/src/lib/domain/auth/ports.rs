use std::collections::HashMap;

use async_trait::async_trait;
use auth::Principal;
use auth::Role;

use crate::domain::auth::errors::AuthError;
use crate::domain::auth::models::LoginCommand;
use crate::domain::auth::models::LoginOutcome;
use crate::domain::auth::models::TokenPair;
use crate::domain::session::models::RefreshToken;
use crate::domain::user::models::RegisterCommand;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::models::Username;

/// Port for authentication and session lifecycle operations.
#[async_trait]
pub trait AuthServicePort: Send + Sync + 'static {
    /// Create an account. No token is issued.
    ///
    /// # Arguments
    /// * `command` - Validated username, optional email and password
    ///
    /// # Returns
    /// Created user entity
    ///
    /// # Errors
    /// * `UserExists` - Username or email is already taken
    /// * `Timeout` / `Unavailable` - Store did not answer
    async fn register(&self, command: RegisterCommand) -> Result<User, AuthError>;

    /// Verify credentials and open a new session.
    ///
    /// # Arguments
    /// * `command` - Raw credentials and the refresh token being superseded
    ///
    /// # Returns
    /// The user with a fresh access token and refresh token
    ///
    /// # Errors
    /// * `InvalidCredentials` - Unknown username or wrong password, indistinguishably
    /// * `Timeout` / `Unavailable` - Store did not answer
    async fn login(&self, command: LoginCommand) -> Result<LoginOutcome, AuthError>;

    /// Exchange a refresh token for a new token pair, rotating the session.
    ///
    /// # Arguments
    /// * `refresh_token` - Current refresh token of the session
    ///
    /// # Returns
    /// New access token and new refresh token; the presented one is dead
    ///
    /// # Errors
    /// * `InvalidRefreshToken` - Unknown, forged or already rotated token
    /// * `RefreshTokenExpired` - Session expired; it has been removed
    /// * `Timeout` / `Unavailable` - Store did not answer
    async fn refresh(&self, refresh_token: &RefreshToken) -> Result<TokenPair, AuthError>;

    /// End the session holding this refresh token.
    ///
    /// Idempotent: an unknown token is success.
    ///
    /// # Errors
    /// * `Timeout` / `Unavailable` - Store did not answer
    async fn logout(&self, refresh_token: &RefreshToken) -> Result<(), AuthError>;

    /// Verify an access token without touching any store.
    ///
    /// # Errors
    /// * `Unauthorized` - Token is missing, invalid or expired
    fn authorize(&self, access_token: &str) -> Result<Principal, AuthError>;

    /// Owner-or-admin rule.
    ///
    /// # Errors
    /// * `Forbidden` - Requester is neither the owner nor an admin
    fn check_ownership(
        &self,
        resource_owner_id: Option<i64>,
        requester_id: i64,
        role: Role,
    ) -> Result<(), AuthError>;

    /// Report which user an unexpired session belongs to, without rotating it.
    ///
    /// # Errors
    /// * `InvalidRefreshToken` - No session holds this token
    /// * `RefreshTokenExpired` - Session exists but expired
    async fn check_session(&self, refresh_token: &RefreshToken) -> Result<User, AuthError>;

    /// Retrieve user by unique identifier.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    async fn get_user(&self, id: UserId) -> Result<User, AuthError>;

    /// Resolve author names for a page of content.
    ///
    /// Unknown ids are left out of the map. An empty batch never reaches the store.
    async fn get_usernames(&self, ids: &[UserId]) -> Result<HashMap<UserId, Username>, AuthError>;

    /// Remove every expired session.
    ///
    /// # Returns
    /// Number of sessions removed
    async fn purge_expired_sessions(&self) -> Result<u64, AuthError>;
}
