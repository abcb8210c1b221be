//! In-process repositories.
//!
//! Same contracts as the Postgres adapters, including unique constraints and
//! the compare-and-swap rotation, so the domain can run without a database.

use std::collections::HashMap;
use std::sync::atomic::AtomicI64;
use std::sync::atomic::Ordering;

use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use tokio::sync::Mutex;

use crate::domain::errors::StoreError;
use crate::domain::session::models::NewSession;
use crate::domain::session::models::RefreshToken;
use crate::domain::session::models::Session;
use crate::domain::session::models::SessionId;
use crate::domain::session::ports::SessionRepository;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::NewUser;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::models::Username;
use crate::domain::user::ports::UserRepository;

#[derive(Default)]
pub struct InMemoryUserRepository {
    users: Mutex<HashMap<UserId, User>>,
    next_id: AtomicI64,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: NewUser) -> Result<User, StoreError> {
        let mut users = self.users.lock().await;

        if users.values().any(|u| u.username == user.username) {
            return Err(StoreError::UniqueViolation(
                "users_username_key".to_string(),
            ));
        }
        if user.email.is_some() && users.values().any(|u| u.email == user.email) {
            return Err(StoreError::UniqueViolation("users_email_key".to_string()));
        }

        let id = UserId(self.next_id.fetch_add(1, Ordering::SeqCst) + 1);
        let user = user.with_id(id);
        users.insert(id, user.clone());

        Ok(user)
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, StoreError> {
        Ok(self.users.lock().await.get(&id).cloned())
    }

    async fn find_by_username(&self, username: &Username) -> Result<Option<User>, StoreError> {
        let users = self.users.lock().await;
        Ok(users.values().find(|u| &u.username == username).cloned())
    }

    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<User>, StoreError> {
        let users = self.users.lock().await;
        Ok(users
            .values()
            .find(|u| u.email.as_ref() == Some(email))
            .cloned())
    }

    async fn find_usernames_by_ids(
        &self,
        ids: &[UserId],
    ) -> Result<HashMap<UserId, Username>, StoreError> {
        let users = self.users.lock().await;
        Ok(ids
            .iter()
            .filter_map(|id| users.get(id).map(|u| (*id, u.username.clone())))
            .collect())
    }
}

#[derive(Default)]
pub struct InMemorySessionRepository {
    sessions: Mutex<HashMap<SessionId, Session>>,
    next_id: AtomicI64,
}

impl InMemorySessionRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored sessions, expired ones included.
    pub async fn len(&self) -> usize {
        self.sessions.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl SessionRepository for InMemorySessionRepository {
    async fn create(&self, session: NewSession) -> Result<Session, StoreError> {
        let mut sessions = self.sessions.lock().await;

        if sessions
            .values()
            .any(|s| s.refresh_token == session.refresh_token)
        {
            return Err(StoreError::UniqueViolation(
                "sessions_refresh_token_key".to_string(),
            ));
        }

        let id = SessionId(self.next_id.fetch_add(1, Ordering::SeqCst) + 1);
        let session = session.with_id(id);
        sessions.insert(id, session.clone());

        Ok(session)
    }

    async fn find_by_refresh_token(
        &self,
        token: &RefreshToken,
    ) -> Result<Option<Session>, StoreError> {
        let sessions = self.sessions.lock().await;
        Ok(sessions
            .values()
            .find(|s| &s.refresh_token == token)
            .cloned())
    }

    async fn replace(
        &self,
        id: SessionId,
        current: &RefreshToken,
        replacement: &RefreshToken,
        expires_at: DateTime<Utc>,
    ) -> Result<bool, StoreError> {
        let mut sessions = self.sessions.lock().await;

        match sessions.get_mut(&id) {
            Some(session) if &session.refresh_token == current => {
                session.refresh_token = replacement.clone();
                session.expires_at = expires_at;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn delete(&self, id: SessionId) -> Result<bool, StoreError> {
        Ok(self.sessions.lock().await.remove(&id).is_some())
    }

    async fn delete_expired(&self, now: DateTime<Utc>) -> Result<u64, StoreError> {
        let mut sessions = self.sessions.lock().await;
        let before = sessions.len();
        sessions.retain(|_, s| s.expires_at >= now);

        Ok((before - sessions.len()) as u64)
    }
}
