use anyhow::{Context, Result, anyhow};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Postgres,
    Memory,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: Option<String>,
    pub jwt_secret: String,
    pub credential_secret: String,
    pub run_migrations: bool,
    pub port: u16,
    pub kafka_broker: String,
    pub db_max_conn: u32,
    pub db_min_conn: u32,
    pub notify_timeout_ms: u64,
    pub storage_backend: StorageBackend,
    pub otel_endpoint: String,
    pub is_dev: bool,
    pub enable_file_log: bool,
}

fn flag(name: &str) -> bool {
    std::env::var(name)
        .map(|v| v == "true" || v == "1")
        .unwrap_or(false)
}

impl Config {
    pub fn init() -> Result<Self> {
        let storage_backend = match std::env::var("STORAGE_BACKEND")
            .unwrap_or_else(|_| "postgres".to_string())
            .as_str()
        {
            "postgres" => StorageBackend::Postgres,
            "memory" => StorageBackend::Memory,
            other => {
                return Err(anyhow!(
                    "STORAGE_BACKEND must be 'postgres' or 'memory', got '{}'",
                    other
                ));
            }
        };

        let database_url = match storage_backend {
            StorageBackend::Postgres => Some(
                std::env::var("DATABASE_URL")
                    .context("Missing environment variable: DATABASE_URL")?,
            ),
            StorageBackend::Memory => std::env::var("DATABASE_URL").ok(),
        };

        let jwt_secret =
            std::env::var("JWT_SECRET").context("Missing environment variable: JWT_SECRET")?;
        let credential_secret = std::env::var("CREDENTIAL_SECRET")
            .context("Missing environment variable: CREDENTIAL_SECRET")?;

        let run_migrations_str = std::env::var("RUN_MIGRATIONS")
            .context("Missing environment variable: RUN_MIGRATIONS")?;
        let run_migrations = match run_migrations_str.as_str() {
            "true" => true,
            "false" => false,
            other => {
                return Err(anyhow!(
                    "RUN_MIGRATIONS must be 'true' or 'false', got '{}'",
                    other
                ));
            }
        };

        let port = std::env::var("PORT")
            .context("Missing environment variable: PORT")?
            .parse::<u16>()
            .context("PORT must be a valid u16 integer")?;

        let kafka_broker = std::env::var("KAFKA").context("Missing environment variable: KAFKA")?;

        let db_max_conn = std::env::var("DB_MAX_CONNECTION")
            .unwrap_or_else(|_| "5".to_string())
            .parse::<u32>()
            .context("Unable to parse DB_MAX_CONNECTION as u32")?;

        let db_min_conn = std::env::var("DB_MIN_CONNECTION")
            .unwrap_or_else(|_| "1".to_string())
            .parse::<u32>()
            .context("Unable to parse DB_MIN_CONNECTION as u32")?;

        let notify_timeout_ms = std::env::var("NOTIFY_TIMEOUT_MS")
            .unwrap_or_else(|_| "5000".to_string())
            .parse::<u64>()
            .context("Unable to parse NOTIFY_TIMEOUT_MS as u64")?;

        let otel_endpoint = std::env::var("OTEL_ENDPOINT")
            .unwrap_or_else(|_| "http://otel-collector:4317".to_string());

        Ok(Self {
            database_url,
            jwt_secret,
            credential_secret,
            run_migrations,
            port,
            kafka_broker,
            db_max_conn,
            db_min_conn,
            notify_timeout_ms,
            storage_backend,
            otel_endpoint,
            is_dev: flag("DEV_MODE"),
            enable_file_log: flag("ENABLE_FILE_LOG"),
        })
    }
}
