//! Infrastructure layer: storage, the bounded write executor, orchestration, config.

pub mod config;
pub mod db;
pub mod jobs;
pub mod product_service;
pub mod product_store;

pub use config::{AppConfig, ConfigError};
pub use jobs::{BoundedExecutor, ExecError, ExecutorConfig};
pub use product_service::{ProductCatalog, ProductService, ServiceError};
pub use product_store::{InMemoryProductStore, PostgresProductStore, ProductStore, StoreError};
