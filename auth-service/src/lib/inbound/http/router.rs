use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::Request;
use axum::http::Response;
use axum::middleware;
use axum::routing::get;
use axum::routing::post;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::cookie::CookieSettings;
use super::handlers::check_session::check_session;
use super::handlers::get_current_user::get_current_user;
use super::handlers::login::login;
use super::handlers::logout::logout;
use super::handlers::refresh::refresh;
use super::handlers::register::register;
use super::middleware::authenticate as auth_middleware;
use crate::domain::auth::ports::AuthServicePort;

#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<dyn AuthServicePort>,
    pub cookie: CookieSettings,
}

pub fn create_router(auth_service: Arc<dyn AuthServicePort>, cookie: CookieSettings) -> Router {
    let state = AppState {
        auth_service,
        cookie,
    };

    let public_routes = Router::new()
        .route("/api/auth/register", post(register))
        .route("/api/auth/login", post(login))
        .route("/api/auth/refresh", post(refresh))
        .route("/api/auth/logout", post(logout))
        .route("/api/auth/session", get(check_session));

    let protected_routes = Router::new()
        .route("/api/users/me", get(get_current_user))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    // Headers stay out of spans: they carry bearer tokens and cookies.
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version(),
            )
        })
        .on_request(|request: &Request<Body>, _span: &Span| {
            tracing::info!(
                method = %request.method(),
                uri = %request.uri(),
                "Request started"
            );
        })
        .on_response(
            |response: &Response<Body>, latency: Duration, _span: &Span| {
                tracing::info!(
                    status = response.status().as_u16(),
                    latency_ms = latency.as_millis(),
                    "Request completed"
                );
            },
        );

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(trace_layer)
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use auth::Authenticator;
    use auth::TokenSettings;
    use axum::http::StatusCode;
    use axum_extra::extract::cookie::SameSite;
    use tower::ServiceExt;

    use super::*;
    use crate::domain::auth::service::AuthService;
    use crate::outbound::repositories::InMemorySessionRepository;
    use crate::outbound::repositories::InMemoryUserRepository;

    fn router() -> Router {
        let authenticator = Arc::new(Authenticator::new(TokenSettings::new(
            b"router-test-secret-at-least-32-bytes".to_vec(),
        )));
        let service: Arc<dyn AuthServicePort> = Arc::new(AuthService::new(
            Arc::new(InMemoryUserRepository::new()),
            Arc::new(InMemorySessionRepository::new()),
            authenticator.clone(),
        ));
        let cookie = CookieSettings::new(true, SameSite::Strict, authenticator.refresh_ttl());

        create_router(service, cookie)
    }

    #[tokio::test]
    async fn test_protected_route_without_bearer() {
        let response = router()
            .oneshot(
                Request::builder()
                    .uri("/api/users/me")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_refresh_without_cookie() {
        let response = router()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/auth/refresh")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_logout_without_cookie_clears_it() {
        let response = router()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/auth/logout")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let set_cookie = response
            .headers()
            .get(axum::http::header::SET_COOKIE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default();
        assert!(set_cookie.starts_with("refresh_token=;"));
        assert!(set_cookie.contains("Max-Age=0"));
    }
}
