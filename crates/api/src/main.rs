use anyhow::Context;
use tokio_util::sync::CancellationToken;

use catalog_api::{app, shutdown::shutdown_signal};
use catalog_infra::{AppConfig, PostgresProductStore, db};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    catalog_observability::init();

    let config = AppConfig::from_env().context("invalid configuration")?;
    tracing::debug!(?config, "configuration loaded");

    let shutdown = CancellationToken::new();

    let (services, pool) = if config.use_in_memory_store {
        tracing::warn!("USE_IN_MEMORY_STORE set; products will not survive a restart");
        (
            app::AppServices::in_memory(config.executor(), shutdown.clone()),
            None,
        )
    } else {
        let pool = db::connect(&config.database)
            .await
            .context("failed to connect to database")?;
        PostgresProductStore::new(pool.clone())
            .migrate()
            .await
            .context("failed to migrate products schema")?;
        (
            app::AppServices::persistent(pool.clone(), config.executor(), shutdown.clone()),
            Some(pool),
        )
    };

    let app = app::build_app(services);

    let address = config.server_address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind {address}"))?;

    tracing::info!(
        address = %listener.local_addr()?,
        timeout_secs = config.executor_timeout.as_secs(),
        "listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown.clone()))
        .await
        .context("server error")?;

    if let Some(pool) = pool {
        db::close_pool(pool).await;
    }

    tracing::info!("server stopped");
    Ok(())
}
