use crate::{
    abstract_trait::DynEmailService,
    config::EmailConfig,
    handler::EmailHandler,
    service::{EmailService, KafkaEmailService},
};
use shared::{domain::TICKET_EMAIL_TOPIC, errors::ServiceError, utils::shutdown_signal};
use std::sync::Arc;
use tracing::info;

pub struct EmailServiceApp {
    config: EmailConfig,
}

impl EmailServiceApp {
    pub fn new(config: EmailConfig) -> Self {
        Self { config }
    }

    pub async fn run(self) -> Result<(), ServiceError> {
        let email_service = Arc::new(EmailService::new(
            &self.config.smtp_user,
            &self.config.smtp_pass,
            &self.config.smtp_server,
            self.config.smtp_port,
            &self.config.sender,
        )?) as DynEmailService;

        let handler = EmailHandler::new(email_service);

        let kafka_service = KafkaEmailService::new(
            &self.config.kafka_broker,
            "email-service-group",
            &[TICKET_EMAIL_TOPIC],
            handler,
        )?;

        info!("🚀 Starting Email Service...");
        kafka_service.start_consuming(shutdown_signal()).await;

        Ok(())
    }
}
