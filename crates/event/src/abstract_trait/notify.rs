use crate::domain::ticket::TicketPayload;
use async_trait::async_trait;
use serde_json::Value;
use shared::{domain::EmailRequest, errors::ServiceError};
use std::sync::Arc;

pub type DynTicketNotifier = Arc<dyn TicketNotifierTrait + Send + Sync>;
pub type DynWebhookClient = Arc<dyn WebhookClientTrait + Send + Sync>;
pub type DynCredentialEncoder = Arc<dyn CredentialEncoderTrait + Send + Sync>;

#[async_trait]
pub trait TicketNotifierTrait {
    async fn send_ticket(&self, request: &EmailRequest) -> Result<(), ServiceError>;
}

#[async_trait]
pub trait WebhookClientTrait {
    async fn post(&self, url: &str, payload: &Value) -> Result<(), ServiceError>;
}

pub trait CredentialEncoderTrait {
    fn encode(&self, payload: &TicketPayload) -> Result<String, ServiceError>;
    fn decode(&self, credential: &str) -> Result<TicketPayload, ServiceError>;
}
