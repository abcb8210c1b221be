use axum::extract::Request;
use axum::extract::State;
use axum::middleware::Next;
use axum::response::IntoResponse;
use axum::response::Response;
use axum_extra::headers::authorization::Bearer;
use axum_extra::headers::Authorization;
use axum_extra::TypedHeader;

use crate::domain::auth::errors::AuthError;
use crate::domain::auth::errors::TokenRejection;
use crate::domain::auth::ports::AuthServicePort;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::router::AppState;

/// Middleware that verifies the bearer access token and stores the
/// resulting `auth::Principal` in request extensions.
pub async fn authenticate(
    State(state): State<AppState>,
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
    mut req: Request,
    next: Next,
) -> Result<Response, Response> {
    let TypedHeader(Authorization(bearer)) = bearer.ok_or_else(|| {
        ApiError::from(AuthError::Unauthorized(TokenRejection::Missing)).into_response()
    })?;

    let principal = state.auth_service.authorize(bearer.token()).map_err(|e| {
        tracing::debug!(error = %e, "Access token rejected");
        ApiError::from(e).into_response()
    })?;

    req.extensions_mut().insert(principal);

    Ok(next.run(req).await)
}
