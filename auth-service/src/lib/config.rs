use std::env;
use std::time::Duration;

use auth::TokenSettings;
use axum_extra::extract::cookie::SameSite;
use config::Config as ConfigBuilder;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;

use crate::inbound::http::cookie::parse_same_site;
use crate::inbound::http::cookie::CookieSettings;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub jwt: JwtConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub cookie: CookieConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_acquire_timeout_ms")]
    pub acquire_timeout_ms: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub http_port: u16,
    pub grpc_port: u16,
}

#[derive(Deserialize, Clone)]
pub struct JwtConfig {
    pub secret: String,
    #[serde(default = "default_access_ttl_minutes")]
    pub access_ttl_minutes: i64,
    #[serde(default = "default_refresh_ttl_days")]
    pub refresh_ttl_days: i64,
}

impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"<redacted>")
            .field("access_ttl_minutes", &self.access_ttl_minutes)
            .field("refresh_ttl_days", &self.refresh_ttl_days)
            .finish()
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct SessionConfig {
    /// Deadline for each individual store call.
    pub store_timeout_ms: u64,
    /// Period of the expired-session purge; 0 disables it.
    pub purge_interval_secs: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            store_timeout_ms: 5_000,
            purge_interval_secs: 3_600,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct CookieConfig {
    pub secure: bool,
    pub same_site: String,
}

impl Default for CookieConfig {
    fn default() -> Self {
        Self {
            secure: true,
            same_site: "strict".to_string(),
        }
    }
}

fn default_max_connections() -> u32 {
    5
}

fn default_acquire_timeout_ms() -> u64 {
    3_000
}

fn default_access_ttl_minutes() -> i64 {
    TokenSettings::DEFAULT_ACCESS_TTL_MINUTES
}

fn default_refresh_ttl_days() -> i64 {
    TokenSettings::DEFAULT_REFRESH_TTL_DAYS
}

impl Config {
    pub const MIN_SECRET_BYTES: usize = 32;
    pub const MAX_ACCESS_TTL_MINUTES: i64 = 24 * 60;
    pub const MAX_REFRESH_TTL_DAYS: i64 = 365;

    /// Load configuration from files with environment variable overrides
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (DATABASE__URL, JWT__SECRET, etc.)
    /// 2. Environment-specific config file (config/{environment}.toml)
    /// 3. Default config file (config/default.toml)
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let configuration = ConfigBuilder::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Example: JWT__SECRET=... overrides jwt.secret
            .add_source(Environment::with_prefix("").separator("__"))
            .build()?;

        let config: Config = configuration.try_deserialize()?;
        config.validate()?;

        Ok(config)
    }

    /// Reject settings the service cannot run safely with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.jwt.secret.len() < Self::MIN_SECRET_BYTES {
            return Err(ConfigError::Message(format!(
                "jwt.secret must be at least {} bytes",
                Self::MIN_SECRET_BYTES
            )));
        }
        self.access_ttl()?;
        self.refresh_ttl()?;
        if self.session.store_timeout_ms == 0 {
            return Err(ConfigError::Message(
                "session.store_timeout_ms must be positive".to_string(),
            ));
        }
        self.same_site()?;

        Ok(())
    }

    pub fn token_settings(&self) -> Result<TokenSettings, ConfigError> {
        Ok(TokenSettings::new(self.jwt.secret.as_bytes().to_vec())
            .with_access_ttl(self.access_ttl()?)
            .with_refresh_ttl(self.refresh_ttl()?))
    }

    pub fn cookie_settings(&self) -> Result<CookieSettings, ConfigError> {
        Ok(CookieSettings::new(
            self.cookie.secure,
            self.same_site()?,
            self.refresh_ttl()?,
        ))
    }

    pub fn store_timeout(&self) -> Duration {
        Duration::from_millis(self.session.store_timeout_ms)
    }

    fn access_ttl(&self) -> Result<chrono::Duration, ConfigError> {
        let minutes = self.jwt.access_ttl_minutes;
        if !(1..=Self::MAX_ACCESS_TTL_MINUTES).contains(&minutes) {
            return Err(ConfigError::Message(format!(
                "jwt.access_ttl_minutes must be between 1 and {}, got {}",
                Self::MAX_ACCESS_TTL_MINUTES,
                minutes
            )));
        }
        chrono::Duration::try_minutes(minutes).ok_or_else(|| {
            ConfigError::Message(format!("jwt.access_ttl_minutes out of range: {}", minutes))
        })
    }

    fn refresh_ttl(&self) -> Result<chrono::Duration, ConfigError> {
        let days = self.jwt.refresh_ttl_days;
        if !(1..=Self::MAX_REFRESH_TTL_DAYS).contains(&days) {
            return Err(ConfigError::Message(format!(
                "jwt.refresh_ttl_days must be between 1 and {}, got {}",
                Self::MAX_REFRESH_TTL_DAYS,
                days
            )));
        }
        chrono::Duration::try_days(days).ok_or_else(|| {
            ConfigError::Message(format!("jwt.refresh_ttl_days out of range: {}", days))
        })
    }

    fn same_site(&self) -> Result<SameSite, ConfigError> {
        parse_same_site(&self.cookie.same_site).ok_or_else(|| {
            ConfigError::Message(format!(
                "cookie.same_site must be strict, lax or none, got {}",
                self.cookie.same_site
            ))
        })
    }
}
