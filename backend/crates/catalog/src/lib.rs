//! Catalog (Products) Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Product entity, listing query, repository trait
//! - `application/` - Use cases
//! - `infra/` - PostgreSQL and in-memory repositories
//! - `presentation/` - HTTP handlers, DTOs, router
//!
//! Listing supports name search, a whitelisted sort column and
//! page/limit pagination returned in a `kernel::page::Page` envelope.

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

// Re-exports for convenience
pub use error::{CatalogError, CatalogResult};
pub use infra::{InMemoryCatalogRepository, PgCatalogRepository};
pub use presentation::handlers::CatalogAppState;
pub use presentation::router::catalog_router;
