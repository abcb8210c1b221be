use axum::extract::State;
use axum::http::StatusCode;
use axum_extra::extract::CookieJar;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::auth::ports::AuthServicePort;
use crate::inbound::http::cookie::refresh_token_from;
use crate::inbound::http::router::AppState;

/// End the session behind the refresh cookie and clear it. Always succeeds
/// for a client without a live session.
pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<(CookieJar, ApiSuccess<LogoutResponseData>), ApiError> {
    if let Some(token) = refresh_token_from(&jar) {
        state.auth_service.logout(&token).await?;
    }

    let jar = jar.add(state.cookie.removal_cookie());

    Ok((
        jar,
        ApiSuccess::new(
            StatusCode::OK,
            LogoutResponseData {
                message: "Logged out".to_string(),
            },
        ),
    ))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogoutResponseData {
    pub message: String,
}
