use std::sync::Arc;

use tonic::Status;

use crate::domain::auth::ports::AuthServicePort;
use crate::domain::user::models::UserId;
use crate::proto::GetUserRequest;
use crate::proto::GetUserResponse;

pub async fn get_user(
    service: Arc<dyn AuthServicePort>,
    request: GetUserRequest,
) -> Result<GetUserResponse, Status> {
    let user = service.get_user(UserId(request.user_id)).await?;

    Ok(GetUserResponse {
        user: Some(user.into()),
    })
}
