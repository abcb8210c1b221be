use std::sync::Arc;

use auth::Role;
use tonic::Status;

use crate::domain::auth::errors::AuthError;
use crate::domain::auth::ports::AuthServicePort;
use crate::proto::CheckOwnershipRequest;
use crate::proto::CheckOwnershipResponse;

pub fn check_ownership(
    service: Arc<dyn AuthServicePort>,
    request: CheckOwnershipRequest,
) -> Result<CheckOwnershipResponse, Status> {
    let role = request
        .role
        .parse::<Role>()
        .map_err(|e| Status::invalid_argument(e.to_string()))?;

    match service.check_ownership(request.resource_owner_id, request.requester_id, role) {
        Ok(()) => Ok(CheckOwnershipResponse { allowed: true }),
        Err(AuthError::Forbidden) => Ok(CheckOwnershipResponse { allowed: false }),
        Err(e) => Err(e.into()),
    }
}
