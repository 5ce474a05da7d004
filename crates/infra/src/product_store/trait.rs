use thiserror::Error;

use catalog_core::ProductId;
use catalog_products::{Product, ProductDraft};

/// Product store operation error.
///
/// These are **infrastructure errors** (absence, storage failures) as opposed to
/// domain errors (validation).
#[derive(Debug, Error)]
pub enum StoreError {
    /// No live row with this id (never existed, or soft-deleted).
    #[error("product not found")]
    NotFound,

    /// The backing database rejected or failed the operation.
    #[error("database error in {operation}: {source}")]
    Database {
        operation: &'static str,
        #[source]
        source: sqlx::Error,
    },

    /// The store cannot serve requests at all (e.g. poisoned lock, closed pool).
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    pub fn database(operation: &'static str, source: sqlx::Error) -> Self {
        match source {
            sqlx::Error::RowNotFound => Self::NotFound,
            sqlx::Error::PoolClosed => {
                Self::Unavailable(format!("connection pool closed in {operation}"))
            }
            source => Self::Database { operation, source },
        }
    }
}

/// Durable product storage with soft delete and offset pagination.
///
/// ## Visibility
///
/// Rows carrying a soft-delete marker are invisible to every method: `get_by_id`
/// returns `None`, `get_all` neither returns nor counts them, and `update` /
/// `delete` report [`StoreError::NotFound`].
///
/// ## Identity and timestamps
///
/// `create` assigns a fresh id (never reused) and sets `created_at = updated_at`.
/// `update` advances `updated_at` and leaves `id` / `created_at` untouched.
///
/// ## Concurrency
///
/// Implementations only guarantee per-statement atomicity. No per-id locking is
/// provided, so two concurrent fetch-then-update sequences may overwrite each other.
#[async_trait::async_trait]
pub trait ProductStore: Send + Sync {
    /// Insert a new product and return it as persisted.
    async fn create(&self, draft: ProductDraft) -> Result<Product, StoreError>;

    /// Fetch a live product.
    async fn get_by_id(&self, id: ProductId) -> Result<Option<Product>, StoreError>;

    /// Fetch a page of live products ordered by id, plus the live total.
    async fn get_all(&self, offset: u64, limit: u32) -> Result<(Vec<Product>, u64), StoreError>;

    /// Persist the mutable fields of an existing live product.
    async fn update(&self, product: Product) -> Result<Product, StoreError>;

    /// Soft-delete a live product.
    async fn delete(&self, id: ProductId) -> Result<(), StoreError>;
}
