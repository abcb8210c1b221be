use axum::extract::State;
use axum::http::StatusCode;
use axum_extra::extract::CookieJar;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use super::UserData;
use crate::domain::auth::ports::AuthServicePort;
use crate::inbound::http::cookie::refresh_token_from;
use crate::inbound::http::router::AppState;

pub async fn check_session(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<ApiSuccess<SessionResponseData>, ApiError> {
    let token = refresh_token_from(&jar)
        .ok_or_else(|| ApiError::Unauthorized("Missing refresh token".to_string()))?;

    let user = state.auth_service.check_session(&token).await?;

    Ok(ApiSuccess::new(
        StatusCode::OK,
        SessionResponseData {
            authenticated: true,
            user: (&user).into(),
        },
    ))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionResponseData {
    pub authenticated: bool,
    pub user: UserData,
}
