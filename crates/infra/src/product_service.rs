//! Product catalog orchestration (application-level use cases).
//!
//! Maps the five catalog operations onto the store:
//!
//! ```text
//! create ─┐
//!         ├─> BoundedExecutor (spawned task, deadline, cancellation) ─> ProductStore
//! update ─┘
//! get / list / delete ─────────────────────────────────────────────> ProductStore
//! ```
//!
//! Only the write paths go through the executor. Reads, listings and deletes are
//! awaited directly with no deadline of their own.
//!
//! `update` runs "fetch, apply, save" as one unit inside the executor, so a slow
//! fetch counts against the same deadline as the save. Two concurrent updates of the
//! same product are not serialized; the last save wins.

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::info;

use catalog_core::{DomainError, ProductId};
use catalog_products::{PageRequest, ProductPage, ProductRequest, ProductResponse};

use crate::jobs::{BoundedExecutor, ExecError};
use crate::product_store::{ProductStore, StoreError};

#[derive(Debug, Error)]
pub enum ServiceError {
    /// The request payload failed validation (deterministic).
    #[error("validation failed: {0}")]
    Validation(String),
    /// No live product with this id.
    #[error("product not found")]
    NotFound,
    /// The caller's token was cancelled while waiting on a write.
    #[error("operation cancelled")]
    Cancelled,
    /// A write did not finish within the executor deadline.
    #[error("operation timed out after {0:?}")]
    TimedOut(Duration),
    /// The write worker died before reporting back.
    #[error("worker exited without delivering a result")]
    WorkerLost,
    /// Any other store failure.
    #[error(transparent)]
    Store(StoreError),
}

impl From<StoreError> for ServiceError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound => Self::NotFound,
            other => Self::Store(other),
        }
    }
}

impl From<DomainError> for ServiceError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::NotFound => Self::NotFound,
            DomainError::Validation(msg) | DomainError::InvalidId(msg) => Self::Validation(msg),
        }
    }
}

impl From<ExecError<StoreError>> for ServiceError {
    fn from(err: ExecError<StoreError>) -> Self {
        match err {
            ExecError::Operation(store_err) => store_err.into(),
            ExecError::Cancelled => Self::Cancelled,
            ExecError::TimedOut(after) => Self::TimedOut(after),
            ExecError::WorkerLost => Self::WorkerLost,
        }
    }
}

/// Catalog use cases as seen by the transport layer.
#[async_trait::async_trait]
pub trait ProductService: Send + Sync {
    /// Validate and persist a new product (through the executor).
    async fn create(
        &self,
        cancel: &CancellationToken,
        req: ProductRequest,
    ) -> Result<ProductResponse, ServiceError>;

    /// Fetch one live product.
    async fn get(&self, id: ProductId) -> Result<ProductResponse, ServiceError>;

    /// One page of live products. Non-positive or missing inputs are clamped
    /// (page to 1, limit to the default of 10).
    async fn list(
        &self,
        page: Option<i64>,
        limit: Option<i64>,
    ) -> Result<ProductPage<ProductResponse>, ServiceError>;

    /// Validate, then fetch + apply + save as one unit (through the executor).
    async fn update(
        &self,
        cancel: &CancellationToken,
        id: ProductId,
        req: ProductRequest,
    ) -> Result<ProductResponse, ServiceError>;

    /// Soft-delete a live product.
    async fn delete(&self, id: ProductId) -> Result<(), ServiceError>;
}

/// The one production implementation of [`ProductService`].
pub struct ProductCatalog<S> {
    store: Arc<S>,
    executor: BoundedExecutor,
}

impl<S> Clone for ProductCatalog<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            executor: self.executor.clone(),
        }
    }
}

impl<S: ProductStore + 'static> ProductCatalog<S> {
    pub fn new(store: Arc<S>, executor: BoundedExecutor) -> Self {
        Self { store, executor }
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    pub fn executor(&self) -> &BoundedExecutor {
        &self.executor
    }
}

#[async_trait::async_trait]
impl<S: ProductStore + 'static> ProductService for ProductCatalog<S> {
    async fn create(
        &self,
        cancel: &CancellationToken,
        req: ProductRequest,
    ) -> Result<ProductResponse, ServiceError> {
        let draft = req.validate()?;

        let store = Arc::clone(&self.store);
        let product = self
            .executor
            .execute(cancel, move || async move { store.create(draft).await })
            .await?;

        info!(id = %product.id, "product created");
        Ok(product.to_response())
    }

    async fn get(&self, id: ProductId) -> Result<ProductResponse, ServiceError> {
        let product = self.store.get_by_id(id).await?.ok_or(ServiceError::NotFound)?;
        Ok(product.to_response())
    }

    async fn list(
        &self,
        page: Option<i64>,
        limit: Option<i64>,
    ) -> Result<ProductPage<ProductResponse>, ServiceError> {
        let request = PageRequest::new(page, limit);
        let (products, total) = self
            .store
            .get_all(request.offset(), request.limit())
            .await?;

        Ok(ProductPage {
            data: products.into_iter().map(|p| p.to_response()).collect(),
            total,
            page: request.page(),
            limit: request.limit(),
        })
    }

    async fn update(
        &self,
        cancel: &CancellationToken,
        id: ProductId,
        req: ProductRequest,
    ) -> Result<ProductResponse, ServiceError> {
        let draft = req.validate()?;

        let store = Arc::clone(&self.store);
        let product = self
            .executor
            .execute(cancel, move || async move {
                let mut product = store.get_by_id(id).await?.ok_or(StoreError::NotFound)?;
                product.apply(&draft);
                store.update(product).await
            })
            .await?;

        info!(id = %product.id, "product updated");
        Ok(product.to_response())
    }

    async fn delete(&self, id: ProductId) -> Result<(), ServiceError> {
        self.store.delete(id).await?;
        info!(id = %id, "product soft-deleted");
        Ok(())
    }
}
