use thiserror::Error;

/// Error for persistence operations.
///
/// Shared by the user and session repositories. The `Database` cause is for
/// logs only and never reaches a client.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    #[error("Unique constraint violated: {0}")]
    UniqueViolation(String),

    #[error("Store operation timed out")]
    Timeout,

    #[error("Database error: {0}")]
    Database(String),
}
