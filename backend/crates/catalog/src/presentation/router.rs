//! Catalog Router

use axum::{
    Router,
    routing::{get, put},
};

use crate::domain::repository::ProductRepository;
use crate::presentation::handlers::{self, CatalogAppState};

/// Routes mounted at `/product`.
///
/// Carries no authorization of its own; the composing application wraps
/// it in the bearer gate.
pub fn catalog_router<R>(state: CatalogAppState<R>) -> Router
where
    R: ProductRepository + Send + Sync + 'static,
{
    Router::new()
        .route(
            "/",
            get(handlers::list_products::<R>).post(handlers::create_product::<R>),
        )
        .route(
            "/{id}",
            put(handlers::update_product::<R>).delete(handlers::delete_product::<R>),
        )
        .with_state(state)
}
