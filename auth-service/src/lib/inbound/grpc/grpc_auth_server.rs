use std::sync::Arc;

use tonic::Request;
use tonic::Response;
use tonic::Status;

use super::handlers::check_ownership;
use super::handlers::get_user;
use super::handlers::get_usernames;
use super::handlers::login;
use super::handlers::logout;
use super::handlers::refresh_token;
use super::handlers::register;
use super::handlers::validate_token;
use crate::domain::auth::ports::AuthServicePort;
use crate::proto::auth_service_server::AuthService as AuthServiceProto;
use crate::proto::CheckOwnershipRequest;
use crate::proto::CheckOwnershipResponse;
use crate::proto::GetUserRequest;
use crate::proto::GetUserResponse;
use crate::proto::GetUsernamesRequest;
use crate::proto::GetUsernamesResponse;
use crate::proto::LoginRequest;
use crate::proto::LoginResponse;
use crate::proto::LogoutRequest;
use crate::proto::LogoutResponse;
use crate::proto::RefreshTokenRequest;
use crate::proto::RefreshTokenResponse;
use crate::proto::RegisterRequest;
use crate::proto::RegisterResponse;
use crate::proto::ValidateTokenRequest;
use crate::proto::ValidateTokenResponse;

pub struct AuthGrpcService {
    service: Arc<dyn AuthServicePort>,
}

impl AuthGrpcService {
    pub fn new(service: Arc<dyn AuthServicePort>) -> Self {
        Self { service }
    }
}

#[tonic::async_trait]
impl AuthServiceProto for AuthGrpcService {
    async fn register(
        &self,
        request: Request<RegisterRequest>,
    ) -> Result<Response<RegisterResponse>, Status> {
        let response = register::register(self.service.clone(), request.into_inner()).await?;
        Ok(Response::new(response))
    }

    async fn login(
        &self,
        request: Request<LoginRequest>,
    ) -> Result<Response<LoginResponse>, Status> {
        let response = login::login(self.service.clone(), request.into_inner()).await?;
        Ok(Response::new(response))
    }

    async fn refresh_token(
        &self,
        request: Request<RefreshTokenRequest>,
    ) -> Result<Response<RefreshTokenResponse>, Status> {
        let response =
            refresh_token::refresh_token(self.service.clone(), request.into_inner()).await?;
        Ok(Response::new(response))
    }

    async fn logout(
        &self,
        request: Request<LogoutRequest>,
    ) -> Result<Response<LogoutResponse>, Status> {
        let response = logout::logout(self.service.clone(), request.into_inner()).await?;
        Ok(Response::new(response))
    }

    async fn validate_token(
        &self,
        request: Request<ValidateTokenRequest>,
    ) -> Result<Response<ValidateTokenResponse>, Status> {
        let response = validate_token::validate_token(self.service.clone(), request.into_inner());
        Ok(Response::new(response))
    }

    async fn get_user(
        &self,
        request: Request<GetUserRequest>,
    ) -> Result<Response<GetUserResponse>, Status> {
        let response = get_user::get_user(self.service.clone(), request.into_inner()).await?;
        Ok(Response::new(response))
    }

    async fn get_usernames(
        &self,
        request: Request<GetUsernamesRequest>,
    ) -> Result<Response<GetUsernamesResponse>, Status> {
        let response =
            get_usernames::get_usernames(self.service.clone(), request.into_inner()).await?;
        Ok(Response::new(response))
    }

    async fn check_ownership(
        &self,
        request: Request<CheckOwnershipRequest>,
    ) -> Result<Response<CheckOwnershipResponse>, Status> {
        let response =
            check_ownership::check_ownership(self.service.clone(), request.into_inner())?;
        Ok(Response::new(response))
    }
}
