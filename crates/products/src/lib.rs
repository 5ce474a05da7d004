//! Products domain module.
//!
//! This crate contains business rules for the product catalog, implemented purely as
//! deterministic domain logic (no IO, no HTTP, no storage).

pub mod pagination;
pub mod product;

pub use pagination::{DEFAULT_LIMIT, PageRequest, ProductPage};
pub use product::{Product, ProductDraft, ProductRequest, ProductResponse};
pub use catalog_core::ProductId;
