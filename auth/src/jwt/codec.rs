use std::sync::Arc;

use chrono::Duration;
use jsonwebtoken::decode;
use jsonwebtoken::encode;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;
use serde::de::DeserializeOwned;
use serde::Serialize;
use uuid::Uuid;

use super::claims::AccessClaims;
use super::claims::Expiring;
use super::claims::RefreshClaims;
use super::claims::ACCESS_AUDIENCE;
use super::claims::REFRESH_AUDIENCE;
use super::errors::JwtError;
use crate::access::Role;
use crate::clock::Clock;

/// Signs and verifies access and refresh tokens.
///
/// Uses HS256 (HMAC with SHA-256) with a single symmetric secret. Only HS256
/// is on the allow-list: a token whose header names any other algorithm is
/// rejected before its signature is looked at.
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
    clock: Arc<dyn Clock>,
}

impl TokenCodec {
    /// Create a new codec with a secret key.
    ///
    /// # Arguments
    /// * `secret` - Secret key for signing tokens (should be at least 32 bytes)
    /// * `clock` - Time source used for both issuance and expiry checks
    pub fn new(secret: &[u8], clock: Arc<dyn Clock>) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            algorithm: Algorithm::HS256,
            clock,
        }
    }

    /// Sign an access token for a user.
    ///
    /// # Errors
    /// * `EncodingFailed` - Token encoding failed
    pub fn sign_access(&self, user_id: i64, role: Role, ttl: Duration) -> Result<String, JwtError> {
        let now = self.clock.now();
        let claims = AccessClaims {
            user_id,
            role,
            aud: ACCESS_AUDIENCE.to_string(),
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
        };

        self.encode(&claims)
    }

    /// Verify an access token and return its claims.
    ///
    /// # Errors
    /// * `InvalidToken` - Bad signature, unexpected algorithm, wrong token
    ///   kind or malformed structure
    /// * `TokenExpired` - Structurally valid token past its expiry
    pub fn verify_access(&self, token: &str) -> Result<AccessClaims, JwtError> {
        self.decode(token, ACCESS_AUDIENCE)
    }

    /// Sign a refresh token for a user.
    ///
    /// # Errors
    /// * `EncodingFailed` - Token encoding failed
    pub fn sign_refresh(&self, user_id: i64, ttl: Duration) -> Result<String, JwtError> {
        let now = self.clock.now();
        let claims = RefreshClaims {
            user_id,
            jti: Uuid::new_v4().simple().to_string(),
            aud: REFRESH_AUDIENCE.to_string(),
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
        };

        self.encode(&claims)
    }

    /// Verify a refresh token and return its claims.
    ///
    /// Session lookups go by exact token value and do not need this; it exists
    /// for deployments and tools that inspect refresh tokens directly.
    ///
    /// # Errors
    /// * `InvalidToken` - Bad signature, unexpected algorithm, wrong token
    ///   kind or malformed structure
    /// * `TokenExpired` - Structurally valid token past its expiry
    pub fn verify_refresh(&self, token: &str) -> Result<RefreshClaims, JwtError> {
        self.decode(token, REFRESH_AUDIENCE)
    }

    fn encode<T: Serialize>(&self, claims: &T) -> Result<String, JwtError> {
        let header = Header::new(self.algorithm);

        encode(&header, claims, &self.encoding_key)
            .map_err(|e| JwtError::EncodingFailed(e.to_string()))
    }

    fn decode<T>(&self, token: &str, audience: &str) -> Result<T, JwtError>
    where
        T: DeserializeOwned + Expiring,
    {
        if token.is_empty() {
            return Err(JwtError::InvalidToken("empty token".to_string()));
        }

        let mut validation = Validation::new(self.algorithm);
        // Expiry is checked below against our own clock.
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_audience(&[audience]);
        validation.set_required_spec_claims(&["exp", "aud"]);

        let token_data = decode::<T>(token, &self.decoding_key, &validation)
            .map_err(|e| JwtError::InvalidToken(format!("{:?}", e.kind())))?;

        if token_data.claims.is_expired(self.clock.now().timestamp()) {
            return Err(JwtError::TokenExpired);
        }

        Ok(token_data.claims)
    }
}
