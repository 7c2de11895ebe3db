//! Application Layer
//!
//! Use cases.

pub mod manage_products;

pub use manage_products::{CreateProductInput, ManageProductsUseCase};
