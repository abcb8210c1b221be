//! Domain flows and adapter contracts against a real Postgres.
//!
//! Each test creates its own database on `DATABASE_URL`.
//! Run with `cargo test -- --ignored`.

mod common;

use std::sync::Arc;

use auth::Role;
use auth_service::domain::auth::errors::AuthError;
use auth_service::domain::auth::models::LoginCommand;
use auth_service::domain::auth::ports::AuthServicePort;
use auth_service::domain::errors::StoreError;
use auth_service::domain::session::models::NewSession;
use auth_service::domain::session::models::RefreshToken;
use auth_service::domain::session::ports::SessionRepository;
use auth_service::domain::user::models::EmailAddress;
use auth_service::domain::user::models::NewUser;
use auth_service::domain::user::models::RegisterCommand;
use auth_service::domain::user::models::UserId;
use auth_service::domain::user::models::Username;
use auth_service::domain::user::ports::UserRepository;
use auth_service::outbound::repositories::PostgresUserRepository;
use chrono::Duration;
use chrono::Utc;
use common::PgTestContext;

fn register_command(username: &str, email: Option<&str>) -> RegisterCommand {
    RegisterCommand::parse(
        username.to_string(),
        "pw1".to_string(),
        email.map(str::to_string),
    )
    .expect("Invalid registration input")
}

fn new_user(username: &str, email: Option<&str>) -> NewUser {
    NewUser {
        username: Username::new(username.to_string()).unwrap(),
        email: email.map(|e| EmailAddress::new(e.to_string()).unwrap()),
        role: Role::User,
        password_hash: "$argon2id$hash".to_string(),
        created_at: Utc::now(),
    }
}

#[tokio::test]
#[ignore = "requires Postgres at DATABASE_URL"]
async fn test_create_assigns_ids_and_maps_unique_violations() {
    let context = PgTestContext::new().await;

    let alice = context
        .users
        .create(new_user("alice", Some("alice@example.com")))
        .await
        .unwrap();
    let bob = context.users.create(new_user("bob", None)).await.unwrap();

    assert!(bob.id.as_i64() > alice.id.as_i64());
    assert_eq!(
        context.users.find_by_id(alice.id).await.unwrap().unwrap().username,
        alice.username
    );

    let same_username = context.users.create(new_user("alice", None)).await;
    let same_email = context
        .users
        .create(new_user("carol", Some("alice@example.com")))
        .await;

    assert!(matches!(same_username, Err(StoreError::UniqueViolation(_))));
    assert!(matches!(same_email, Err(StoreError::UniqueViolation(_))));
}

#[tokio::test]
#[ignore = "requires Postgres at DATABASE_URL"]
async fn test_replace_with_stale_token_updates_nothing() {
    let context = PgTestContext::new().await;
    let user = context.users.create(new_user("alice", None)).await.unwrap();
    let expiry = Utc::now() + Duration::days(1);
    let session = context
        .sessions
        .create(NewSession {
            user_id: user.id,
            refresh_token: RefreshToken::new("first"),
            expires_at: expiry,
            created_at: Utc::now(),
        })
        .await
        .unwrap();

    let first = RefreshToken::new("first");
    let second = RefreshToken::new("second");
    let third = RefreshToken::new("third");

    assert!(context
        .sessions
        .replace(session.id, &first, &second, expiry)
        .await
        .unwrap());
    assert!(!context
        .sessions
        .replace(session.id, &first, &third, expiry)
        .await
        .unwrap());

    let stored = context
        .sessions
        .find_by_refresh_token(&second)
        .await
        .unwrap()
        .expect("Rotated session missing");
    assert_eq!(stored.id, session.id);
    assert!(context
        .sessions
        .find_by_refresh_token(&third)
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
#[ignore = "requires Postgres at DATABASE_URL"]
async fn test_delete_expired_and_user_cascade() {
    let context = PgTestContext::new().await;
    let user = context.users.create(new_user("alice", None)).await.unwrap();
    let now = Utc::now();

    for (token, expires_at) in [
        ("stale", now - Duration::seconds(1)),
        ("fresh", now + Duration::days(1)),
    ] {
        context
            .sessions
            .create(NewSession {
                user_id: user.id,
                refresh_token: RefreshToken::new(token),
                expires_at,
                created_at: now,
            })
            .await
            .unwrap();
    }

    assert_eq!(context.sessions.delete_expired(now).await.unwrap(), 1);
    assert_eq!(context.session_count().await, 1);

    sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(user.id.as_i64())
        .execute(&context.db.pool)
        .await
        .unwrap();

    assert_eq!(context.session_count().await, 0);
}

#[tokio::test]
#[ignore = "requires Postgres at DATABASE_URL"]
async fn test_find_usernames_by_ids() {
    let context = PgTestContext::new().await;
    let alice = context.users.create(new_user("alice", None)).await.unwrap();
    let bob = context.users.create(new_user("bob", None)).await.unwrap();

    let usernames = context
        .users
        .find_usernames_by_ids(&[alice.id, bob.id, UserId(999_999)])
        .await
        .unwrap();

    assert_eq!(usernames.len(), 2);
    assert_eq!(usernames[&alice.id].as_str(), "alice");
    assert_eq!(usernames[&bob.id].as_str(), "bob");
    assert!(context
        .users
        .find_usernames_by_ids(&[])
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
#[ignore = "requires Postgres at DATABASE_URL"]
async fn test_exhausted_pool_is_timeout() {
    let context = PgTestContext::new().await;
    let pool = context
        .db
        .pool_with(1, std::time::Duration::from_millis(100))
        .await;
    let users = PostgresUserRepository::new(pool.clone());

    let _held = pool.acquire().await.unwrap();

    assert!(matches!(
        users.find_by_id(UserId(1)).await,
        Err(StoreError::Timeout)
    ));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
#[ignore = "requires Postgres at DATABASE_URL"]
async fn test_concurrent_registration_creates_one_user() {
    let context = PgTestContext::new().await;

    let mut handles = Vec::new();
    for i in 0..4 {
        let service = context.service.clone();
        // Distinct emails: only the username constraint can decide the race.
        let email = format!("alice{}@example.com", i);
        handles.push(tokio::spawn(async move {
            service
                .register(register_command("alice", Some(&email)))
                .await
        }));
    }

    let mut created = 0;
    let mut exists = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => created += 1,
            Err(AuthError::UserExists) => exists += 1,
            Err(e) => panic!("Unexpected error: {}", e),
        }
    }

    assert_eq!(created, 1);
    assert_eq!(exists, 3);

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
        .fetch_one(&context.db.pool)
        .await
        .unwrap();
    assert_eq!(count, 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
#[ignore = "requires Postgres at DATABASE_URL"]
async fn test_concurrent_refresh_exactly_one_wins() {
    let context = PgTestContext::new().await;
    context
        .service
        .register(register_command("alice", None))
        .await
        .unwrap();
    let token = context
        .service
        .login(LoginCommand::new("alice", "pw1"))
        .await
        .unwrap()
        .tokens
        .refresh_token;

    let barrier = Arc::new(tokio::sync::Barrier::new(8));
    let mut handles = Vec::new();
    for _ in 0..8 {
        let service = context.service.clone();
        let token = token.clone();
        let barrier = barrier.clone();
        handles.push(tokio::spawn(async move {
            barrier.wait().await;
            service.refresh(&token).await
        }));
    }

    let mut winners = Vec::new();
    for handle in handles {
        match handle.await.unwrap() {
            Ok(pair) => winners.push(pair),
            Err(AuthError::InvalidRefreshToken) => {}
            Err(e) => panic!("Unexpected error: {}", e),
        }
    }

    assert_eq!(winners.len(), 1);
    assert_eq!(context.session_count().await, 1);
    assert!(context
        .service
        .refresh(&winners[0].refresh_token)
        .await
        .is_ok());
}

#[tokio::test]
#[ignore = "requires Postgres at DATABASE_URL"]
async fn test_expired_refresh_removes_row() {
    let context = PgTestContext::new().await;
    context
        .service
        .register(register_command("alice", None))
        .await
        .unwrap();
    let token = context
        .service
        .login(LoginCommand::new("alice", "pw1"))
        .await
        .unwrap()
        .tokens
        .refresh_token;

    context.clock.advance(Duration::days(35) + Duration::seconds(1));

    assert!(matches!(
        context.service.refresh(&token).await,
        Err(AuthError::RefreshTokenExpired)
    ));
    assert_eq!(context.session_count().await, 0);
}
