mod common;

use auth_service::proto::CheckOwnershipRequest;
use auth_service::proto::GetUserRequest;
use auth_service::proto::GetUsernamesRequest;
use auth_service::proto::LoginRequest;
use auth_service::proto::LogoutRequest;
use auth_service::proto::RefreshTokenRequest;
use auth_service::proto::RegisterRequest;
use auth_service::proto::ValidateTokenRequest;
use chrono::Duration;
use common::TestGrpc;
use tonic::Code;

async fn register_and_login(grpc: &mut TestGrpc) -> auth_service::proto::LoginResponse {
    grpc.client
        .register(RegisterRequest {
            username: "alice".to_string(),
            password: "pw1".to_string(),
            email: Some("alice@example.com".to_string()),
        })
        .await
        .expect("Register failed");

    grpc.client
        .login(LoginRequest {
            username: "alice".to_string(),
            password: "pw1".to_string(),
            previous_refresh_token: None,
        })
        .await
        .expect("Login failed")
        .into_inner()
}

#[tokio::test]
async fn test_register_and_get_user() {
    let mut grpc = TestGrpc::spawn().await;

    let registered = grpc
        .client
        .register(RegisterRequest {
            username: "alice".to_string(),
            password: "pw1".to_string(),
            email: None,
        })
        .await
        .unwrap()
        .into_inner()
        .user
        .unwrap();

    let fetched = grpc
        .client
        .get_user(GetUserRequest {
            user_id: registered.id,
        })
        .await
        .unwrap()
        .into_inner()
        .user
        .unwrap();

    assert_eq!(fetched.username, "alice");
    assert_eq!(fetched.role, "user");
    assert_eq!(fetched.email, None);
}

#[tokio::test]
async fn test_register_duplicate_is_already_exists() {
    let mut grpc = TestGrpc::spawn().await;
    register_and_login(&mut grpc).await;

    let status = grpc
        .client
        .register(RegisterRequest {
            username: "alice".to_string(),
            password: "pw2".to_string(),
            email: None,
        })
        .await
        .unwrap_err();

    assert_eq!(status.code(), Code::AlreadyExists);
}

#[tokio::test]
async fn test_get_unknown_user() {
    let mut grpc = TestGrpc::spawn().await;

    let status = grpc
        .client
        .get_user(GetUserRequest { user_id: 999 })
        .await
        .unwrap_err();

    assert_eq!(status.code(), Code::NotFound);
}

#[tokio::test]
async fn test_get_usernames_batch() {
    let mut grpc = TestGrpc::spawn().await;

    let mut ids = Vec::new();
    for username in ["alice", "bob"] {
        let user = grpc
            .client
            .register(RegisterRequest {
                username: username.to_string(),
                password: "pw1".to_string(),
                email: None,
            })
            .await
            .unwrap()
            .into_inner()
            .user
            .unwrap();
        ids.push(user.id);
    }

    let usernames = grpc
        .client
        .get_usernames(GetUsernamesRequest {
            user_ids: vec![ids[0], ids[1], 999, ids[0]],
        })
        .await
        .unwrap()
        .into_inner()
        .usernames;

    assert_eq!(usernames.len(), 2);
    assert_eq!(usernames[&ids[0]], "alice");
    assert_eq!(usernames[&ids[1]], "bob");
    assert!(!usernames.contains_key(&999));

    let empty = grpc
        .client
        .get_usernames(GetUsernamesRequest { user_ids: vec![] })
        .await
        .unwrap()
        .into_inner()
        .usernames;

    assert!(empty.is_empty());
}

#[tokio::test]
async fn test_bad_credentials_are_unauthenticated() {
    let mut grpc = TestGrpc::spawn().await;
    register_and_login(&mut grpc).await;

    let status = grpc
        .client
        .login(LoginRequest {
            username: "alice".to_string(),
            password: "nope".to_string(),
            previous_refresh_token: None,
        })
        .await
        .unwrap_err();

    assert_eq!(status.code(), Code::Unauthenticated);
}

#[tokio::test]
async fn test_validate_token() {
    let mut grpc = TestGrpc::spawn().await;
    let login = register_and_login(&mut grpc).await;

    let valid = grpc
        .client
        .validate_token(ValidateTokenRequest {
            access_token: login.access_token.clone(),
        })
        .await
        .unwrap()
        .into_inner();

    assert!(valid.valid);
    assert_eq!(valid.user_id, login.user.unwrap().id);
    assert_eq!(valid.role, "user");

    let forged = grpc
        .client
        .validate_token(ValidateTokenRequest {
            access_token: "forged".to_string(),
        })
        .await
        .unwrap()
        .into_inner();

    assert!(!forged.valid);
    assert_eq!(forged.reason, "invalid");

    let missing = grpc
        .client
        .validate_token(ValidateTokenRequest {
            access_token: String::new(),
        })
        .await
        .unwrap()
        .into_inner();

    assert!(!missing.valid);
    assert_eq!(missing.reason, "missing");

    grpc.context.clock.advance(Duration::minutes(16));

    let expired = grpc
        .client
        .validate_token(ValidateTokenRequest {
            access_token: login.access_token,
        })
        .await
        .unwrap()
        .into_inner();

    assert!(!expired.valid);
    assert_eq!(expired.reason, "expired");
}

#[tokio::test]
async fn test_refresh_and_logout() {
    let mut grpc = TestGrpc::spawn().await;
    let login = register_and_login(&mut grpc).await;

    let rotated = grpc
        .client
        .refresh_token(RefreshTokenRequest {
            refresh_token: login.refresh_token.clone(),
        })
        .await
        .unwrap()
        .into_inner();

    assert_ne!(rotated.refresh_token, login.refresh_token);

    let replay = grpc
        .client
        .refresh_token(RefreshTokenRequest {
            refresh_token: login.refresh_token,
        })
        .await
        .unwrap_err();
    assert_eq!(replay.code(), Code::Unauthenticated);

    grpc.client
        .logout(LogoutRequest {
            refresh_token: rotated.refresh_token.clone(),
        })
        .await
        .unwrap();
    grpc.client
        .logout(LogoutRequest {
            refresh_token: rotated.refresh_token,
        })
        .await
        .unwrap();

    assert!(grpc.context.sessions.is_empty().await);
}

#[tokio::test]
async fn test_check_ownership() {
    let mut grpc = TestGrpc::spawn().await;

    let cases = [
        (Some(5), 5, "user", true),
        (Some(5), 6, "user", false),
        (Some(5), 6, "admin", true),
        (None, 6, "user", false),
        (None, 6, "admin", true),
    ];

    for (owner, requester, role, expected) in cases {
        let response = grpc
            .client
            .check_ownership(CheckOwnershipRequest {
                resource_owner_id: owner,
                requester_id: requester,
                role: role.to_string(),
            })
            .await
            .unwrap()
            .into_inner();

        assert_eq!(
            response.allowed, expected,
            "owner={:?} requester={} role={}",
            owner, requester, role
        );
    }

    let unknown_role = grpc
        .client
        .check_ownership(CheckOwnershipRequest {
            resource_owner_id: Some(1),
            requester_id: 1,
            role: "root".to_string(),
        })
        .await
        .unwrap_err();
    assert_eq!(unknown_role.code(), Code::InvalidArgument);
}
