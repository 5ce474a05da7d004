use std::sync::Arc;

use sqlx::PgPool;
use tokio_util::sync::CancellationToken;

use catalog_infra::{
    BoundedExecutor, ExecutorConfig, InMemoryProductStore, PostgresProductStore, ProductCatalog,
    ProductService,
};

/// Everything the handlers need, shared across requests.
#[derive(Clone)]
pub struct AppServices {
    pub products: Arc<dyn ProductService>,
    /// Root token; every request token is a child of it.
    pub shutdown: CancellationToken,
}

impl AppServices {
    pub fn new(products: Arc<dyn ProductService>, shutdown: CancellationToken) -> Self {
        Self { products, shutdown }
    }

    /// Catalog over a fresh in-memory store (dev mode and tests).
    pub fn in_memory(executor: ExecutorConfig, shutdown: CancellationToken) -> Self {
        let catalog = ProductCatalog::new(
            Arc::new(InMemoryProductStore::new()),
            BoundedExecutor::new(executor),
        );
        Self::new(Arc::new(catalog), shutdown)
    }

    /// Catalog over Postgres. The pool must already be migrated.
    pub fn persistent(pool: PgPool, executor: ExecutorConfig, shutdown: CancellationToken) -> Self {
        let catalog = ProductCatalog::new(
            Arc::new(PostgresProductStore::new(pool)),
            BoundedExecutor::new(executor),
        );
        Self::new(Arc::new(catalog), shutdown)
    }
}
