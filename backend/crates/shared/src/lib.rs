//! Shared Kernel
//!
//! Vocabulary shared by every backend crate:
//! - Error kinds, the unified `AppError` and its conversions
//! - Typed numeric identifiers
//! - Pagination envelope
//!
//! Only things whose meaning is identical across domains belong here.

pub mod error {
    pub mod app_error;
    pub mod conversions;
    pub mod kind;
}
pub mod id;
pub mod page;
