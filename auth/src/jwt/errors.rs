use thiserror::Error;

/// Error type for JWT operations.
///
/// `TokenExpired` is only returned for a token whose signature, algorithm and
/// structure all check out, so callers can tell "refresh silently" apart from
/// "reject".
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum JwtError {
    #[error("Failed to encode token: {0}")]
    EncodingFailed(String),

    #[error("Token is expired")]
    TokenExpired,

    #[error("Token is invalid: {0}")]
    InvalidToken(String),
}
