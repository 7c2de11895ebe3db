//! Domain Layer
//!
//! Product entity, listing parameters and the repository trait.

pub mod entities;
pub mod repository;
pub mod value_objects;

pub use entities::{NewProduct, Product, ProductChanges};
pub use repository::ProductRepository;
pub use value_objects::{ProductQuery, SortField, SortOrder};
