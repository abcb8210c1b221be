use std::sync::Arc;

use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;

use crate::access::Principal;
use crate::access::Role;
use crate::clock::Clock;
use crate::clock::SystemClock;
use crate::jwt::JwtError;
use crate::jwt::TokenCodec;
use crate::password::PasswordError;
use crate::password::PasswordHasher;

/// Token lifetimes and signing secret, built once from configuration.
#[derive(Clone)]
pub struct TokenSettings {
    pub secret: Vec<u8>,
    pub access_ttl: Duration,
    pub refresh_ttl: Duration,
}

impl TokenSettings {
    pub const DEFAULT_ACCESS_TTL_MINUTES: i64 = 15;
    pub const DEFAULT_REFRESH_TTL_DAYS: i64 = 35;

    /// Settings with the default lifetimes (15 minutes / 35 days).
    pub fn new(secret: impl Into<Vec<u8>>) -> Self {
        Self {
            secret: secret.into(),
            access_ttl: Duration::minutes(Self::DEFAULT_ACCESS_TTL_MINUTES),
            refresh_ttl: Duration::days(Self::DEFAULT_REFRESH_TTL_DAYS),
        }
    }

    pub fn with_access_ttl(mut self, ttl: Duration) -> Self {
        self.access_ttl = ttl;
        self
    }

    pub fn with_refresh_ttl(mut self, ttl: Duration) -> Self {
        self.refresh_ttl = ttl;
        self
    }
}

impl std::fmt::Debug for TokenSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenSettings")
            .field("secret", &"<redacted>")
            .field("access_ttl", &self.access_ttl)
            .field("refresh_ttl", &self.refresh_ttl)
            .finish()
    }
}

/// A freshly minted refresh token and the instant it stops being valid.
#[derive(Clone)]
pub struct IssuedRefreshToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Authentication coordinator combining password hashing and token handling.
///
/// One instance is built at startup and shared by reference; services that
/// only validate tokens (the forum service) use [`Authenticator::authorize`]
/// and never touch a store.
pub struct Authenticator {
    password_hasher: PasswordHasher,
    codec: TokenCodec,
    clock: Arc<dyn Clock>,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl Authenticator {
    /// Create a new authenticator on the wall clock.
    pub fn new(settings: TokenSettings) -> Self {
        Self::with_clock(settings, Arc::new(SystemClock))
    }

    /// Create a new authenticator on an explicit clock.
    pub fn with_clock(settings: TokenSettings, clock: Arc<dyn Clock>) -> Self {
        Self {
            password_hasher: PasswordHasher::new(),
            codec: TokenCodec::new(&settings.secret, Arc::clone(&clock)),
            clock,
            access_ttl: settings.access_ttl,
            refresh_ttl: settings.refresh_ttl,
        }
    }

    /// Current time on the authenticator's clock.
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    pub fn access_ttl(&self) -> Duration {
        self.access_ttl
    }

    pub fn refresh_ttl(&self) -> Duration {
        self.refresh_ttl
    }

    /// Hash a password for storage.
    ///
    /// # Errors
    /// * `PasswordError` - Hashing operation failed
    pub fn hash_password(&self, password: &str) -> Result<String, PasswordError> {
        self.password_hasher.hash(password)
    }

    /// Verify a password against a stored hash, or against a throwaway hash
    /// when the account does not exist.
    pub fn verify_password(&self, password: &str, stored_hash: Option<&str>) -> bool {
        match stored_hash {
            Some(hash) => self.password_hasher.verify(password, hash),
            None => self.password_hasher.verify_dummy(password),
        }
    }

    /// Issue an access token with the configured lifetime.
    ///
    /// # Errors
    /// * `JwtError` - Token generation failed
    pub fn issue_access_token(&self, user_id: i64, role: Role) -> Result<String, JwtError> {
        self.codec.sign_access(user_id, role, self.access_ttl)
    }

    /// Issue a refresh token with the configured lifetime.
    ///
    /// The returned expiry is what the session row should store.
    ///
    /// # Errors
    /// * `JwtError` - Token generation failed
    pub fn issue_refresh_token(&self, user_id: i64) -> Result<IssuedRefreshToken, JwtError> {
        let expires_at = self.clock.now() + self.refresh_ttl;
        let token = self.codec.sign_refresh(user_id, self.refresh_ttl)?;

        Ok(IssuedRefreshToken { token, expires_at })
    }

    /// Verify an access token and return the identity it proves.
    ///
    /// Pure verification, no store access.
    ///
    /// # Errors
    /// * `InvalidToken` - Token is forged, malformed or of the wrong kind
    /// * `TokenExpired` - Token is genuine but expired
    pub fn authorize(&self, access_token: &str) -> Result<Principal, JwtError> {
        let claims = self.codec.verify_access(access_token)?;
        Ok(Principal::new(claims.user_id, claims.role))
    }

    /// Underlying codec, for callers that need the raw claims.
    pub fn codec(&self) -> &TokenCodec {
        &self.codec
    }
}
