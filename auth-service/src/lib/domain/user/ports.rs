use std::collections::HashMap;

use async_trait::async_trait;

use crate::domain::errors::StoreError;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::NewUser;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::models::Username;

/// Persistence operations for user aggregate.
#[async_trait]
pub trait UserRepository: Send + Sync + 'static {
    /// Persist new user to storage.
    ///
    /// # Arguments
    /// * `user` - User record without identifier
    ///
    /// # Returns
    /// Created user entity carrying the store-assigned id
    ///
    /// # Errors
    /// * `UniqueViolation` - Username or email is already taken
    /// * `Timeout` - No connection became available in time
    /// * `Database` - Database operation failed
    async fn create(&self, user: NewUser) -> Result<User, StoreError>;

    /// Retrieve user by identifier.
    ///
    /// # Arguments
    /// * `id` - User ID
    ///
    /// # Returns
    /// Optional user entity (None if not found)
    ///
    /// # Errors
    /// * `Database` - Database operation failed
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, StoreError>;

    /// Retrieve user by username.
    ///
    /// # Arguments
    /// * `username` - Username to search for
    ///
    /// # Returns
    /// Optional user entity (None if not found)
    ///
    /// # Errors
    /// * `Database` - Database operation failed
    async fn find_by_username(&self, username: &Username) -> Result<Option<User>, StoreError>;

    /// Retrieve user by email address.
    ///
    /// # Returns
    /// Optional user entity (None if not found)
    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<User>, StoreError>;

    /// Resolve usernames for a batch of identifiers in one round trip.
    ///
    /// Unknown ids are absent from the returned map.
    async fn find_usernames_by_ids(
        &self,
        ids: &[UserId],
    ) -> Result<HashMap<UserId, Username>, StoreError>;
}
