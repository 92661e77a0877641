use anyhow::{Context, Result};
use event::{
    config::myconfig::{Config, StorageBackend},
    di::Repositories,
    handler::AppRouter,
    repository::memory::MemoryStore,
    state::AppState,
};
use shared::{
    config::{ConnectionManager, ConnectionPool},
    utils::{Telemetry, init_logger},
};
use tracing::{error, info, warn};
use tracing_appender::non_blocking::WorkerGuard;

#[tokio::main]
async fn main() -> Result<()> {
    let (config, state, telemetry, _log_guard) =
        setup().await.context("Failed to setup application")?;

    AppRouter::serve(config.port, state)
        .await
        .context("Failed to start server")?;

    shutdown(telemetry);

    Ok(())
}

async fn setup() -> Result<(Config, AppState, Telemetry, Option<WorkerGuard>)> {
    dotenv::dotenv().ok();

    let config = Config::init().context("Failed to load configuration")?;

    let telemetry = Telemetry::init("event-service", &config.otel_endpoint)
        .context("Failed to initialize telemetry")?;

    let log_guard = init_logger(
        &telemetry.logger_provider(),
        "event-service",
        config.is_dev,
        config.enable_file_log,
    );

    let repositories = match (config.storage_backend, config.database_url.as_deref()) {
        (StorageBackend::Postgres, Some(database_url)) => {
            let db_pool =
                ConnectionManager::new_pool(database_url, config.db_min_conn, config.db_max_conn)
                    .await
                    .context("Failed to initialize database pool")?;

            if config.run_migrations {
                run_migrations(&db_pool)
                    .await
                    .context("Failed to migrate database")?;
            }

            Repositories::postgres(db_pool)
        }
        (StorageBackend::Postgres, None) => {
            anyhow::bail!("DATABASE_URL is required for the postgres backend")
        }
        (StorageBackend::Memory, _) => {
            warn!("⚠️ Using the in-memory store; data is lost on restart");
            Repositories::memory(MemoryStore::new())
        }
    };

    let state = AppState::new(repositories, &config).context("Failed to create AppState")?;

    info!("✅ Application setup completed successfully.");
    Ok((config, state, telemetry, log_guard))
}

fn shutdown(telemetry: Telemetry) {
    info!("🛑 Shutting down event service...");

    if let Err(e) = telemetry.shutdown() {
        error!("Failed to shutdown telemetry: {}", e);
    }

    info!("✅ Event service shutdown complete.");
}

async fn run_migrations(pool: &ConnectionPool) -> Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;

    Ok(())
}
