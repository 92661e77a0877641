use anyhow::Context;
use email::{app::EmailServiceApp, config::EmailConfig};
use shared::utils::{Telemetry, init_logger};
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    let config = EmailConfig::init().context("Failed to load configuration")?;

    let telemetry = Telemetry::init("email-service", &config.otel_endpoint)
        .context("Failed to initialize telemetry")?;

    let _log_guard = init_logger(
        &telemetry.logger_provider(),
        "email-service",
        config.is_dev,
        config.enable_file_log,
    );

    let app = EmailServiceApp::new(config);

    if let Err(e) = app.run().await {
        error!("❌ Email service stopped: {e}");
    }

    if let Err(e) = telemetry.shutdown() {
        error!("Failed to shutdown telemetry: {}", e);
    }

    info!("✅ Email Service shutdown gracefully.");

    Ok(())
}
