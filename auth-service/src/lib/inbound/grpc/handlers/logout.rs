use std::sync::Arc;

use tonic::Status;

use crate::domain::auth::ports::AuthServicePort;
use crate::domain::session::models::RefreshToken;
use crate::proto::LogoutRequest;
use crate::proto::LogoutResponse;

pub async fn logout(
    service: Arc<dyn AuthServicePort>,
    request: LogoutRequest,
) -> Result<LogoutResponse, Status> {
    service
        .logout(&RefreshToken::new(request.refresh_token))
        .await?;

    Ok(LogoutResponse {})
}
