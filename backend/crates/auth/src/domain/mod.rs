//! Domain Layer
//!
//! Entities, value objects and repository traits.

pub mod entity;
pub mod repository;
pub mod value_object;

pub use entity::user::{NewUser, User, UserChanges, UserProfile};
pub use repository::UserRepository;
