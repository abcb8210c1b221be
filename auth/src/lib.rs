//! Authentication utilities library
//!
//! Provides reusable authentication infrastructure for the forum services:
//! - Password hashing (Argon2id)
//! - Access and refresh token signing and verification (JWT, HS256)
//! - The owner-or-admin authorization rule
//! - Authentication coordination
//!
//! The auth service uses all of it; the forum service only needs
//! [`Authenticator::authorize`] and [`check_ownership`].
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("my_password").unwrap();
//! assert!(hasher.verify("my_password", &hash));
//! ```
//!
//! ## Issuing and Authorizing Tokens
//! ```
//! use auth::{Authenticator, Role, TokenSettings};
//!
//! let auth = Authenticator::new(TokenSettings::new(b"secret_key_at_least_32_bytes_long!".to_vec()));
//!
//! let token = auth.issue_access_token(42, Role::User).unwrap();
//! let principal = auth.authorize(&token).unwrap();
//! assert_eq!(principal.user_id, 42);
//! ```
//!
//! ## Ownership
//! ```
//! use auth::{check_ownership, Role};
//!
//! assert!(check_ownership(Some(5), 5, Role::User).is_ok());
//! assert!(check_ownership(Some(5), 6, Role::User).is_err());
//! assert!(check_ownership(None, 6, Role::Admin).is_ok());
//! ```

pub mod access;
pub mod authenticator;
pub mod clock;
pub mod jwt;
pub mod password;

// Re-export commonly used items
pub use access::check_ownership;
pub use access::AccessError;
pub use access::Principal;
pub use access::Role;
pub use authenticator::Authenticator;
pub use authenticator::IssuedRefreshToken;
pub use authenticator::TokenSettings;
pub use clock::Clock;
pub use clock::ManualClock;
pub use clock::SystemClock;
pub use jwt::AccessClaims;
pub use jwt::JwtError;
pub use jwt::RefreshClaims;
pub use jwt::TokenCodec;
pub use password::PasswordError;
pub use password::PasswordHasher;
