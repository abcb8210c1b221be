use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use axum_extra::extract::CookieJar;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use super::UserData;
use crate::domain::auth::models::LoginCommand;
use crate::domain::auth::ports::AuthServicePort;
use crate::inbound::http::cookie::refresh_token_from;
use crate::inbound::http::router::AppState;

/// Verify credentials, return an access token and set the refresh cookie.
///
/// A refresh cookie still held by the client is superseded by the new session.
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(body): Json<LoginRequest>,
) -> Result<(CookieJar, ApiSuccess<LoginResponseData>), ApiError> {
    let command =
        LoginCommand::new(body.username, body.password).superseding(refresh_token_from(&jar));

    let outcome = state.auth_service.login(command).await?;

    let jar = jar.add(state.cookie.refresh_cookie(&outcome.tokens.refresh_token));

    Ok((
        jar,
        ApiSuccess::new(
            StatusCode::OK,
            LoginResponseData {
                user: (&outcome.user).into(),
                access_token: outcome.tokens.access_token,
                token_type: "Bearer".to_string(),
            },
        ),
    ))
}

#[derive(Clone, Deserialize)]
pub struct LoginRequest {
    username: String,
    password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoginResponseData {
    pub user: UserData,
    pub access_token: String,
    pub token_type: String,
}
