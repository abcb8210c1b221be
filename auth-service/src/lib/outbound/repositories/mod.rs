pub mod memory;
pub mod session;
pub mod user;

pub use memory::InMemorySessionRepository;
pub use memory::InMemoryUserRepository;
pub use session::PostgresSessionRepository;
pub use user::PostgresUserRepository;

use crate::domain::errors::StoreError;

impl From<sqlx::Error> for StoreError {
    fn from(error: sqlx::Error) -> Self {
        match error {
            sqlx::Error::PoolTimedOut => StoreError::Timeout,
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                StoreError::UniqueViolation(db_err.constraint().unwrap_or("unique").to_string())
            }
            other => StoreError::Database(other.to_string()),
        }
    }
}
