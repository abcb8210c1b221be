use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use auth::Authenticator;
use auth::JwtError;
use auth::Principal;
use auth::Role;
use chrono::DateTime;
use chrono::Utc;

use crate::domain::auth::errors::AuthError;
use crate::domain::auth::errors::TokenRejection;
use crate::domain::auth::models::LoginCommand;
use crate::domain::auth::models::LoginOutcome;
use crate::domain::auth::models::TokenPair;
use crate::domain::auth::ports::AuthServicePort;
use crate::domain::errors::StoreError;
use crate::domain::session::models::NewSession;
use crate::domain::session::models::RefreshToken;
use crate::domain::session::models::Session;
use crate::domain::session::ports::SessionRepository;
use crate::domain::user::models::NewUser;
use crate::domain::user::models::RegisterCommand;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::models::Username;
use crate::domain::user::ports::UserRepository;

/// Domain service implementation for authentication and sessions.
///
/// Concrete implementation of AuthServicePort with dependency injection.
/// Holds no mutable state: every call is independent apart from the stores.
pub struct AuthService<UR, SR>
where
    UR: UserRepository,
    SR: SessionRepository,
{
    users: Arc<UR>,
    sessions: Arc<SR>,
    authenticator: Arc<Authenticator>,
    store_timeout: Duration,
}

impl<UR, SR> AuthService<UR, SR>
where
    UR: UserRepository,
    SR: SessionRepository,
{
    pub const DEFAULT_STORE_TIMEOUT: Duration = Duration::from_secs(5);

    /// Create a new auth service with injected dependencies.
    ///
    /// # Arguments
    /// * `users` - User persistence implementation
    /// * `sessions` - Session persistence implementation
    /// * `authenticator` - Password hashing and token handling
    ///
    /// # Returns
    /// Configured auth service instance
    pub fn new(users: Arc<UR>, sessions: Arc<SR>, authenticator: Arc<Authenticator>) -> Self {
        Self {
            users,
            sessions,
            authenticator,
            store_timeout: Self::DEFAULT_STORE_TIMEOUT,
        }
    }

    /// Deadline applied to every individual store call.
    pub fn with_store_timeout(mut self, timeout: Duration) -> Self {
        self.store_timeout = timeout;
        self
    }

    async fn bounded<T, F>(&self, operation: F) -> Result<T, StoreError>
    where
        F: Future<Output = Result<T, StoreError>> + Send,
    {
        tokio::time::timeout(self.store_timeout, operation)
            .await
            .unwrap_or(Err(StoreError::Timeout))
    }

    /// Access token, refresh token and the refresh token's expiry.
    fn issue_tokens(
        &self,
        user_id: UserId,
        role: Role,
    ) -> Result<(String, RefreshToken, DateTime<Utc>), AuthError> {
        let access_token = self
            .authenticator
            .issue_access_token(user_id.as_i64(), role)
            .map_err(signing_failed)?;
        let issued = self
            .authenticator
            .issue_refresh_token(user_id.as_i64())
            .map_err(signing_failed)?;

        Ok((access_token, RefreshToken::new(issued.token), issued.expires_at))
    }

    async fn find_session(&self, token: &RefreshToken) -> Result<Option<Session>, AuthError> {
        self.bounded(self.sessions.find_by_refresh_token(token))
            .await
            .map_err(|e| AuthError::store("find_session", e))
    }

    async fn delete_session(&self, session: &Session) -> Result<(), AuthError> {
        self.bounded(self.sessions.delete(session.id))
            .await
            .map_err(|e| AuthError::store("delete_session", e))?;
        Ok(())
    }

    /// Signature check before any store access. An expired signature is let
    /// through so the store can clean up the row.
    fn screen_refresh_token(&self, token: &RefreshToken) -> Result<(), AuthError> {
        if token.is_empty() {
            return Err(AuthError::InvalidRefreshToken);
        }

        match self.authenticator.codec().verify_refresh(token.as_str()) {
            Ok(_) | Err(JwtError::TokenExpired) => Ok(()),
            Err(_) => Err(AuthError::InvalidRefreshToken),
        }
    }
}

fn signing_failed(error: JwtError) -> AuthError {
    AuthError::Unavailable {
        operation: "sign_token",
        cause: error.to_string(),
    }
}

#[async_trait]
impl<UR, SR> AuthServicePort for AuthService<UR, SR>
where
    UR: UserRepository,
    SR: SessionRepository,
{
    async fn register(&self, command: RegisterCommand) -> Result<User, AuthError> {
        let RegisterCommand {
            username,
            email,
            password,
        } = command;

        let existing = self
            .bounded(self.users.find_by_username(&username))
            .await
            .map_err(|e| AuthError::store("find_user", e))?;
        if existing.is_some() {
            return Err(AuthError::UserExists);
        }

        if let Some(email) = &email {
            let existing = self
                .bounded(self.users.find_by_email(email))
                .await
                .map_err(|e| AuthError::store("find_user", e))?;
            if existing.is_some() {
                return Err(AuthError::UserExists);
            }
        }

        let password_hash = self
            .authenticator
            .hash_password(password.expose())
            .map_err(|e| AuthError::Unavailable {
                operation: "hash_password",
                cause: e.to_string(),
            })?;

        let new_user = NewUser {
            username,
            email,
            role: Role::User,
            password_hash,
            created_at: self.authenticator.now(),
        };

        // Two concurrent registrations both pass the lookup; the unique
        // constraint decides.
        match self.bounded(self.users.create(new_user)).await {
            Ok(user) => {
                tracing::info!(user_id = %user.id, "User registered");
                Ok(user)
            }
            Err(StoreError::UniqueViolation(_)) => Err(AuthError::UserExists),
            Err(e) => Err(AuthError::store("create_user", e)),
        }
    }

    async fn login(&self, command: LoginCommand) -> Result<LoginOutcome, AuthError> {
        let LoginCommand {
            username,
            password,
            previous_refresh_token,
        } = command;

        let user = match Username::new(username) {
            Ok(username) => self
                .bounded(self.users.find_by_username(&username))
                .await
                .map_err(|e| AuthError::store("find_user", e))?,
            Err(_) => None,
        };

        // Unknown users still pay for a full hash verification.
        let verified = self.authenticator.verify_password(
            &password,
            user.as_ref().map(|u| u.password_hash.as_str()),
        );
        let user = match user {
            Some(user) if verified => user,
            _ => {
                tracing::info!("Login rejected");
                return Err(AuthError::InvalidCredentials);
            }
        };

        if let Some(previous) = previous_refresh_token {
            if let Some(session) = self.find_session(&previous).await? {
                self.delete_session(&session).await?;
                tracing::debug!(session_id = %session.id, "Superseded previous session");
            }
        }

        let (access_token, refresh_token, refresh_expires_at) =
            self.issue_tokens(user.id, user.role)?;

        let session = self
            .bounded(self.sessions.create(NewSession {
                user_id: user.id,
                refresh_token: refresh_token.clone(),
                expires_at: refresh_expires_at,
                created_at: self.authenticator.now(),
            }))
            .await
            .map_err(|e| AuthError::store("create_session", e))?;

        tracing::info!(user_id = %user.id, session_id = %session.id, "User logged in");

        Ok(LoginOutcome {
            user,
            tokens: TokenPair {
                access_token,
                refresh_token,
                refresh_expires_at,
            },
        })
    }

    async fn refresh(&self, refresh_token: &RefreshToken) -> Result<TokenPair, AuthError> {
        self.screen_refresh_token(refresh_token)?;

        let session = self
            .find_session(refresh_token)
            .await?
            .ok_or(AuthError::InvalidRefreshToken)?;

        if session.is_expired(self.authenticator.now()) {
            self.delete_session(&session).await?;
            tracing::info!(session_id = %session.id, "Expired session removed on refresh");
            return Err(AuthError::RefreshTokenExpired);
        }

        let user = self
            .bounded(self.users.find_by_id(session.user_id))
            .await
            .map_err(|e| AuthError::store("find_user", e))?
            .ok_or(AuthError::InvalidRefreshToken)?;

        let (access_token, replacement, refresh_expires_at) =
            self.issue_tokens(user.id, user.role)?;

        let rotated = self
            .bounded(self.sessions.replace(
                session.id,
                refresh_token,
                &replacement,
                refresh_expires_at,
            ))
            .await
            .map_err(|e| AuthError::store("rotate_session", e))?;

        if !rotated {
            tracing::warn!(session_id = %session.id, "Refresh token was already rotated");
            return Err(AuthError::InvalidRefreshToken);
        }

        tracing::debug!(user_id = %user.id, session_id = %session.id, "Session rotated");

        Ok(TokenPair {
            access_token,
            refresh_token: replacement,
            refresh_expires_at,
        })
    }

    async fn logout(&self, refresh_token: &RefreshToken) -> Result<(), AuthError> {
        if refresh_token.is_empty() {
            return Ok(());
        }

        if let Some(session) = self.find_session(refresh_token).await? {
            self.delete_session(&session).await?;
            tracing::info!(user_id = %session.user_id, session_id = %session.id, "User logged out");
        }

        Ok(())
    }

    fn authorize(&self, access_token: &str) -> Result<Principal, AuthError> {
        if access_token.is_empty() {
            return Err(AuthError::Unauthorized(TokenRejection::Missing));
        }

        self.authenticator
            .authorize(access_token)
            .map_err(|e| match e {
                JwtError::TokenExpired => AuthError::Unauthorized(TokenRejection::Expired),
                _ => AuthError::Unauthorized(TokenRejection::Invalid),
            })
    }

    fn check_ownership(
        &self,
        resource_owner_id: Option<i64>,
        requester_id: i64,
        role: Role,
    ) -> Result<(), AuthError> {
        auth::check_ownership(resource_owner_id, requester_id, role)
            .map_err(|_| AuthError::Forbidden)
    }

    async fn check_session(&self, refresh_token: &RefreshToken) -> Result<User, AuthError> {
        self.screen_refresh_token(refresh_token)?;

        let session = self
            .find_session(refresh_token)
            .await?
            .ok_or(AuthError::InvalidRefreshToken)?;

        if session.is_expired(self.authenticator.now()) {
            return Err(AuthError::RefreshTokenExpired);
        }

        self.bounded(self.users.find_by_id(session.user_id))
            .await
            .map_err(|e| AuthError::store("find_user", e))?
            .ok_or(AuthError::InvalidRefreshToken)
    }

    async fn get_user(&self, id: UserId) -> Result<User, AuthError> {
        self.bounded(self.users.find_by_id(id))
            .await
            .map_err(|e| AuthError::store("find_user", e))?
            .ok_or(AuthError::NotFound(format!("user {}", id)))
    }

    async fn get_usernames(&self, ids: &[UserId]) -> Result<HashMap<UserId, Username>, AuthError> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let mut unique = ids.to_vec();
        unique.sort_unstable();
        unique.dedup();

        self.bounded(self.users.find_usernames_by_ids(&unique))
            .await
            .map_err(|e| AuthError::store("find_usernames", e))
    }

    async fn purge_expired_sessions(&self) -> Result<u64, AuthError> {
        let removed = self
            .bounded(self.sessions.delete_expired(self.authenticator.now()))
            .await
            .map_err(|e| AuthError::store("purge_sessions", e))?;

        if removed > 0 {
            tracing::info!(removed, "Purged expired sessions");
        }

        Ok(removed)
    }
}
