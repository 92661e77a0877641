use crate::abstract_trait::DynEmailService;
use rdkafka::{Message, message::BorrowedMessage};
use shared::{domain::EmailRequest, errors::ServiceError};
use tracing::error;

pub struct EmailHandler {
    mailer: DynEmailService,
}

impl EmailHandler {
    pub fn new(mailer: DynEmailService) -> Self {
        Self { mailer }
    }

    pub async fn handle_message(&self, message: &BorrowedMessage<'_>) -> Result<(), ServiceError> {
        let payload = message
            .payload()
            .ok_or_else(|| ServiceError::Internal("Empty message payload".to_string()))?;

        self.handle_payload(payload).await
    }

    /// Decodes one ticket email request and hands it to the mailer.
    pub async fn handle_payload(&self, payload: &[u8]) -> Result<(), ServiceError> {
        let request: EmailRequest = serde_json::from_slice(payload).map_err(|e| {
            error!(
                "Failed to unmarshal message: {e}, payload: {}",
                String::from_utf8_lossy(payload)
            );
            ServiceError::Internal(format!("Invalid JSON payload: {e}"))
        })?;

        self.mailer.send(&request).await.map_err(|e| {
            error!("Failed to send ticket email: {e:?}");
            ServiceError::Internal(format!("Email sending failed: {e}"))
        })
    }
}
