use crate::{
    domain::{
        identity::Actor,
        requests::organizer::WebhookRequest,
        response::{api::ApiResponse, organizer::OrganizerSettingsResponse},
    },
    model::organizer::OrganizerSettings,
};
use async_trait::async_trait;
use shared::errors::{RepositoryError, ServiceError};
use std::sync::Arc;

pub type DynOrganizerRepository = Arc<dyn OrganizerRepositoryTrait + Send + Sync>;
pub type DynOrganizerService = Arc<dyn OrganizerServiceTrait + Send + Sync>;

#[async_trait]
pub trait OrganizerRepositoryTrait {
    async fn find_webhook(&self, organizer_id: i32) -> Result<Option<String>, RepositoryError>;
    async fn upsert_webhook(
        &self,
        organizer_id: i32,
        webhook_url: Option<&str>,
    ) -> Result<OrganizerSettings, RepositoryError>;
}

#[async_trait]
pub trait OrganizerServiceTrait {
    async fn set_webhook(
        &self,
        actor: &Actor,
        req: &WebhookRequest,
    ) -> Result<ApiResponse<OrganizerSettingsResponse>, ServiceError>;
}
