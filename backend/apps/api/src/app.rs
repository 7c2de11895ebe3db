//! Router composition
//!
//! Mounts every feature router under its prefix. Kept free of I/O so the
//! whole API can be exercised against in-memory repositories.

use std::sync::Arc;

use auth::application::config::AuthConfig;
use auth::domain::repository::UserRepository;
use auth::{AuthAppState, auth_router, require_bearer, user_router};
use axum::{
    Json, Router,
    http::{HeaderValue, Method, header},
    middleware,
    routing::get,
};
use catalog::domain::repository::ProductRepository;
use catalog::{CatalogAppState, catalog_router};
use serde_json::{Value, json};
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};

/// GET /
async fn health() -> Json<Value> {
    Json(json!({ "message": "Storefront API is running" }))
}

/// Build the application router.
///
/// Every `/product` route sits behind the bearer gate; see the auth crate
/// for which `/auth` and `/user` routes are gated.
pub fn build_router<U, P>(users: Arc<U>, products: Arc<P>, auth_config: Arc<AuthConfig>) -> Router
where
    U: UserRepository + Send + Sync + 'static,
    P: ProductRepository + Send + Sync + 'static,
{
    let auth_state = AuthAppState::new(users, auth_config);
    let gate = middleware::from_fn_with_state(auth_state.gate(), require_bearer::<U>);

    Router::new()
        .route("/", get(health))
        .nest("/auth", auth_router(auth_state.clone()))
        .nest("/user", user_router(auth_state))
        .nest(
            "/product",
            catalog_router(CatalogAppState::new(products)).route_layer(gate),
        )
}

/// CORS for the configured frontend origins. Unparseable origins are skipped.
///
/// `*` allows every origin by echoing the request's `Origin`, since a literal
/// wildcard cannot be combined with credentials.
pub fn cors_layer(origins: &[String]) -> CorsLayer {
    let allow_origin = if origins.iter().any(|origin| origin == "*") {
        AllowOrigin::mirror_request()
    } else {
        let allowed: Vec<HeaderValue> = origins
            .iter()
            .filter_map(|origin| match origin.parse() {
                Ok(value) => Some(value),
                Err(_) => {
                    tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                    None
                }
            })
            .collect();
        AllowOrigin::list(allowed)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(AllowMethods::list([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ]))
        .allow_headers(AllowHeaders::list([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
        ]))
        .allow_credentials(true)
}
