//! Auth Routers

use axum::{
    Router, middleware,
    routing::{delete, get, post, put},
};

use crate::domain::repository::UserRepository;
use crate::presentation::handlers::{self, AuthAppState};
use crate::presentation::middleware::require_bearer;

/// Routes mounted at `/auth`
pub fn auth_router<R>(state: AuthAppState<R>) -> Router
where
    R: UserRepository + Send + Sync + 'static,
{
    let gate = middleware::from_fn_with_state(state.gate(), require_bearer::<R>);

    Router::new()
        .route("/signup", post(handlers::sign_up::<R>))
        .route("/login", post(handlers::login::<R>))
        .route("/profile", get(handlers::profile).route_layer(gate))
        .route("/validate", get(handlers::validate::<R>))
        .with_state(state)
}

/// Routes mounted at `/user`. Only deletion is gated.
pub fn user_router<R>(state: AuthAppState<R>) -> Router
where
    R: UserRepository + Send + Sync + 'static,
{
    let gate = middleware::from_fn_with_state(state.gate(), require_bearer::<R>);

    Router::new()
        .route(
            "/",
            get(handlers::list_users::<R>).post(handlers::create_user::<R>),
        )
        .route(
            "/{id}",
            put(handlers::update_user::<R>)
                .merge(delete(handlers::delete_user::<R>).route_layer(gate)),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use serde_json::{Map, Value, json};
    use tower::ServiceExt;

    use crate::application::config::AuthConfig;
    use crate::infra::memory::InMemoryAuthRepository;

    fn state() -> AuthAppState<InMemoryAuthRepository> {
        AuthAppState::new(
            Arc::new(InMemoryAuthRepository::new()),
            Arc::new(AuthConfig::new("router-secret")),
        )
    }

    fn app(state: AuthAppState<InMemoryAuthRepository>) -> Router {
        Router::new()
            .nest("/auth", auth_router(state.clone()))
            .nest("/user", user_router(state))
    }

    fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn bearer_request(method: &str, uri: &str, token: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .body(Body::empty())
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn sign_up_and_login(app: &Router) -> (i64, String) {
        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/auth/signup",
                json!({ "name": "A", "email": "a@x.com", "userName": "a1", "password": "pw" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/auth/login",
                json!({ "emailOrUsername": "a@x.com", "password": "pw" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        (
            body["user"]["id"].as_i64().unwrap(),
            body["access_token"].as_str().unwrap().to_string(),
        )
    }

    #[tokio::test]
    async fn test_signup_message_and_duplicate() {
        let app = app(state());
        let signup = json!({ "name": "A", "email": "a@x.com", "userName": "a1", "password": "pw" });

        let response = app
            .clone()
            .oneshot(json_request("POST", "/auth/signup", signup.clone()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["message"], "Signup successful");

        let response = app
            .oneshot(json_request("POST", "/auth/signup", signup))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["detail"], "Email or Username already used");
        assert_eq!(body["message"], "Email or Username already used");
    }

    #[tokio::test]
    async fn test_login_failure_is_401_without_challenge() {
        let app = app(state());
        sign_up_and_login(&app).await;

        let response = app
            .oneshot(json_request(
                "POST",
                "/auth/login",
                json!({ "emailOrUsername": "a@x.com", "password": "wrong" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(response.headers().get(header::WWW_AUTHENTICATE).is_none());
        let body = body_json(response).await;
        assert_eq!(body["detail"], "Invalid credentials");
        assert_eq!(body["message"], "Invalid credentials");
    }

    #[tokio::test]
    async fn test_profile_with_valid_token() {
        let app = app(state());
        let (id, token) = sign_up_and_login(&app).await;

        let response = app
            .oneshot(bearer_request("GET", "/auth/profile", &token))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["id"], id);
        assert_eq!(body["email"], "a@x.com");
        assert!(body.get("password").is_none());
    }

    #[tokio::test]
    async fn test_profile_without_header_is_401_with_challenge() {
        let app = app(state());

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/auth/profile")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(response.headers()[header::WWW_AUTHENTICATE], "Bearer");
        assert_eq!(body_json(response).await["detail"], "Could not validate credentials");
    }

    #[tokio::test]
    async fn test_profile_with_expired_token_is_401() {
        let state = state();
        let app = app(state.clone());
        let (id, _) = sign_up_and_login(&app).await;

        let expired = state
            .issuer
            .issue(kernel::id::UserId::new(id), Map::new(), Some(Duration::ZERO))
            .unwrap();

        let response = app
            .oneshot(bearer_request("GET", "/auth/profile", &expired))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(response.headers()[header::WWW_AUTHENTICATE], "Bearer");
    }

    #[tokio::test]
    async fn test_profile_with_non_bearer_scheme_is_401() {
        let app = app(state());
        let (_, token) = sign_up_and_login(&app).await;

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/auth/profile")
                    .header(header::AUTHORIZATION, format!("Basic {token}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_validate_endpoint() {
        let app = app(state());
        let (id, token) = sign_up_and_login(&app).await;

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri(format!("/auth/validate?token={token}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let body = body_json(response).await;
        assert_eq!(body["valid"], true);
        assert_eq!(body["user"]["sub"], id.to_string());
        assert_eq!(body["user"]["email"], "a@x.com");

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/auth/validate?token=garbage")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, json!({ "valid": false }));
    }

    #[tokio::test]
    async fn test_user_crud() {
        let app = app(state());
        let (_, token) = sign_up_and_login(&app).await;

        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/user",
                json!({ "name": "B", "email": "b@x.com", "password": "pw", "city": "Hue" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let created = body_json(response).await;
        let b_id = created["id"].as_i64().unwrap();
        assert_eq!(created["city"], "Hue");
        assert_eq!(created["userName"], Value::Null);

        let response = app
            .clone()
            .oneshot(json_request(
                "PUT",
                &format!("/user/{b_id}"),
                json!({ "phone": "0909" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["message"], "User updated successfully");

        let response = app
            .clone()
            .oneshot(json_request("PUT", "/user/9999", json!({ "phone": "1" })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = app
            .clone()
            .oneshot(Request::builder().uri("/user").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let listed = body_json(response).await;
        assert_eq!(listed.as_array().unwrap().len(), 2);
        assert_eq!(listed[0]["id"], b_id);
        assert_eq!(listed[0]["phone"], "0909");

        // Deletion is gated.
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri(format!("/user/{b_id}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = app
            .clone()
            .oneshot(bearer_request("DELETE", &format!("/user/{b_id}"), &token))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["message"], "User deleted successfully");

        let response = app
            .oneshot(bearer_request("DELETE", &format!("/user/{b_id}"), &token))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_token_of_deleted_user_is_rejected() {
        let app = app(state());
        let (id, token) = sign_up_and_login(&app).await;

        let response = app
            .clone()
            .oneshot(bearer_request("DELETE", &format!("/user/{id}"), &token))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .oneshot(bearer_request("GET", "/auth/profile", &token))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
