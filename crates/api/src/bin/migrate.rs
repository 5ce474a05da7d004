//! Create the products schema and exit.

use anyhow::Context;

use catalog_infra::{AppConfig, PostgresProductStore, db};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    catalog_observability::init();

    let config = AppConfig::from_env().context("invalid configuration")?;
    let pool = db::connect(&config.database)
        .await
        .context("failed to connect to database")?;

    let result = PostgresProductStore::new(pool.clone()).migrate().await;
    db::close_pool(pool).await;
    result.context("migration failed")?;

    tracing::info!("migration completed");
    Ok(())
}
