use axum_extra::extract::cookie::Cookie;
use axum_extra::extract::cookie::SameSite;
use axum_extra::extract::CookieJar;

use crate::domain::session::models::RefreshToken;

pub const REFRESH_COOKIE: &str = "refresh_token";

/// Attributes of the refresh token cookie.
#[derive(Debug, Clone)]
pub struct CookieSettings {
    pub secure: bool,
    pub same_site: SameSite,
    pub max_age: time::Duration,
}

impl CookieSettings {
    pub fn new(secure: bool, same_site: SameSite, max_age: chrono::Duration) -> Self {
        Self {
            secure,
            same_site,
            max_age: time::Duration::seconds(max_age.num_seconds()),
        }
    }

    /// `HttpOnly`, `Path=/`, `Max-Age` equal to the refresh token lifetime.
    pub fn refresh_cookie(&self, token: &RefreshToken) -> Cookie<'static> {
        Cookie::build((REFRESH_COOKIE, token.as_str().to_string()))
            .http_only(true)
            .path("/")
            .max_age(self.max_age)
            .same_site(self.same_site)
            .secure(self.secure)
            .build()
    }

    /// Cookie that makes the browser drop the refresh token.
    pub fn removal_cookie(&self) -> Cookie<'static> {
        Cookie::build((REFRESH_COOKIE, ""))
            .http_only(true)
            .path("/")
            .max_age(time::Duration::ZERO)
            .same_site(self.same_site)
            .secure(self.secure)
            .build()
    }
}

/// Refresh token presented by the client, if any.
pub fn refresh_token_from(jar: &CookieJar) -> Option<RefreshToken> {
    jar.get(REFRESH_COOKIE)
        .map(|cookie| cookie.value())
        .filter(|value| !value.is_empty())
        .map(RefreshToken::new)
}

/// Parse a `SameSite` policy name, case-insensitively.
pub fn parse_same_site(value: &str) -> Option<SameSite> {
    match value.to_ascii_lowercase().as_str() {
        "strict" => Some(SameSite::Strict),
        "lax" => Some(SameSite::Lax),
        "none" => Some(SameSite::None),
        _ => None,
    }
}
