use std::sync::Arc;

use tonic::Status;

use crate::domain::auth::models::LoginCommand;
use crate::domain::auth::ports::AuthServicePort;
use crate::domain::session::models::RefreshToken;
use crate::proto::LoginRequest;
use crate::proto::LoginResponse;

pub async fn login(
    service: Arc<dyn AuthServicePort>,
    request: LoginRequest,
) -> Result<LoginResponse, Status> {
    let command = LoginCommand::new(request.username, request.password)
        .superseding(request.previous_refresh_token.map(RefreshToken::new));

    let outcome = service.login(command).await?;

    Ok(LoginResponse {
        user: Some(outcome.user.into()),
        access_token: outcome.tokens.access_token,
        refresh_token: outcome.tokens.refresh_token.into_inner(),
        refresh_token_expires_at: outcome.tokens.refresh_expires_at.timestamp(),
    })
}
