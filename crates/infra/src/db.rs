//! Database adapters: connection pool lifecycle.
//!
//! The pool is opened once at startup and handed to whoever needs it; there is no
//! process-wide handle. Callers close it on shutdown with [`close_pool`].

use std::time::Duration;

use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use tracing::info;

use crate::config::DatabaseConfig;
use crate::product_store::StoreError;

/// Open a connection pool and check that the database answers.
pub async fn connect(config: &DatabaseConfig) -> Result<PgPool, StoreError> {
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(Duration::from_secs(5))
        .connect_with(config.connect_options())
        .await
        .map_err(|e| StoreError::database("connect", e))?;

    check_health(&pool).await?;

    info!(
        host = %config.host,
        port = config.port,
        database = %config.name,
        max_connections = config.max_connections,
        "database connection established"
    );
    Ok(pool)
}

pub async fn check_health(pool: &PgPool) -> Result<(), StoreError> {
    sqlx::query("SELECT 1")
        .execute(pool)
        .await
        .map_err(|e| StoreError::database("health_check", e))?;
    Ok(())
}

/// Wait for checked-out connections to return, then close the pool.
pub async fn close_pool(pool: PgPool) {
    pool.close().await;
    info!("database connection pool closed");
}
