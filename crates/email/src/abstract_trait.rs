use async_trait::async_trait;
use shared::{domain::EmailRequest, errors::ServiceError};
use std::sync::Arc;

pub type DynEmailService = Arc<dyn EmailServiceTrait>;

#[async_trait]
pub trait EmailServiceTrait: Send + Sync {
    async fn send(&self, req: &EmailRequest) -> Result<(), ServiceError>;
}
