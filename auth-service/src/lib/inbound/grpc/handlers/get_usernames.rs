use std::sync::Arc;

use tonic::Status;

use crate::domain::auth::ports::AuthServicePort;
use crate::domain::user::models::UserId;
use crate::proto::GetUsernamesRequest;
use crate::proto::GetUsernamesResponse;

pub async fn get_usernames(
    service: Arc<dyn AuthServicePort>,
    request: GetUsernamesRequest,
) -> Result<GetUsernamesResponse, Status> {
    let ids: Vec<UserId> = request.user_ids.into_iter().map(UserId).collect();
    let usernames = service.get_usernames(&ids).await?;

    Ok(GetUsernamesResponse {
        usernames: usernames
            .into_iter()
            .map(|(id, username)| (id.as_i64(), username.as_str().to_string()))
            .collect(),
    })
}
