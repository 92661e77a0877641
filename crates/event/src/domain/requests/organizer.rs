use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct WebhookRequest {
    /// `null` removes the webhook.
    #[validate(url)]
    pub webhook_url: Option<String>,
}
