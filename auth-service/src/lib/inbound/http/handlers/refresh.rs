use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum_extra::extract::CookieJar;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::auth::errors::AuthError;
use crate::domain::auth::ports::AuthServicePort;
use crate::inbound::http::cookie::refresh_token_from;
use crate::inbound::http::router::AppState;

/// Rotate the refresh cookie and return a fresh access token.
///
/// A dead refresh token also clears the cookie, so the client stops
/// presenting it.
pub async fn refresh(State(state): State<AppState>, jar: CookieJar) -> Response {
    let Some(token) = refresh_token_from(&jar) else {
        return ApiError::Unauthorized("Missing refresh token".to_string()).into_response();
    };

    match state.auth_service.refresh(&token).await {
        Ok(pair) => {
            let jar = jar.add(state.cookie.refresh_cookie(&pair.refresh_token));
            (
                jar,
                ApiSuccess::new(
                    StatusCode::OK,
                    RefreshResponseData {
                        access_token: pair.access_token,
                        token_type: "Bearer".to_string(),
                    },
                ),
            )
                .into_response()
        }
        Err(e @ (AuthError::InvalidRefreshToken | AuthError::RefreshTokenExpired)) => {
            let jar = jar.add(state.cookie.removal_cookie());
            (jar, ApiError::from(e)).into_response()
        }
        Err(e) => ApiError::from(e).into_response(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RefreshResponseData {
    pub access_token: String,
    pub token_type: String,
}
