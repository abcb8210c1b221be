use std::sync::Arc;

use crate::domain::auth::errors::AuthError;
use crate::domain::auth::ports::AuthServicePort;
use crate::proto::ValidateTokenRequest;
use crate::proto::ValidateTokenResponse;

/// Rejection is a normal answer here, reported through `valid` and `reason`.
pub fn validate_token(
    service: Arc<dyn AuthServicePort>,
    request: ValidateTokenRequest,
) -> ValidateTokenResponse {
    match service.authorize(&request.access_token) {
        Ok(principal) => ValidateTokenResponse {
            valid: true,
            user_id: principal.user_id,
            role: principal.role.as_str().to_string(),
            reason: String::new(),
        },
        Err(AuthError::Unauthorized(rejection)) => ValidateTokenResponse {
            valid: false,
            reason: rejection.as_str().to_string(),
            ..Default::default()
        },
        Err(_) => ValidateTokenResponse {
            valid: false,
            reason: "invalid".to_string(),
            ..Default::default()
        },
    }
}
