use std::sync::Arc;

use tonic::Status;

use crate::domain::auth::errors::AuthError;
use crate::domain::auth::ports::AuthServicePort;
use crate::domain::user::models::RegisterCommand;
use crate::proto::RegisterRequest;
use crate::proto::RegisterResponse;

pub async fn register(
    service: Arc<dyn AuthServicePort>,
    request: RegisterRequest,
) -> Result<RegisterResponse, Status> {
    let command = RegisterCommand::parse(request.username, request.password, request.email)
        .map_err(AuthError::from)?;

    let user = service.register(command).await?;

    Ok(RegisterResponse {
        user: Some(user.into()),
    })
}
