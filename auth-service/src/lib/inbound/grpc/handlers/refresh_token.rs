use std::sync::Arc;

use tonic::Status;

use crate::domain::auth::ports::AuthServicePort;
use crate::domain::session::models::RefreshToken;
use crate::proto::RefreshTokenRequest;
use crate::proto::RefreshTokenResponse;

pub async fn refresh_token(
    service: Arc<dyn AuthServicePort>,
    request: RefreshTokenRequest,
) -> Result<RefreshTokenResponse, Status> {
    let pair = service
        .refresh(&RefreshToken::new(request.refresh_token))
        .await?;

    Ok(RefreshTokenResponse {
        access_token: pair.access_token,
        refresh_token: pair.refresh_token.into_inner(),
        refresh_token_expires_at: pair.refresh_expires_at.timestamp(),
    })
}
