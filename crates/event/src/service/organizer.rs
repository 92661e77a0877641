use crate::{
    abstract_trait::organizer::{DynOrganizerRepository, OrganizerServiceTrait},
    domain::{
        identity::{Actor, Role},
        requests::organizer::WebhookRequest,
        response::{api::ApiResponse, organizer::OrganizerSettingsResponse},
    },
    service::validation::invalid,
};
use async_trait::async_trait;
use opentelemetry::KeyValue;
use shared::{errors::ServiceError, utils::OperationTracer};
use tracing::info;
use validator::Validate;

#[derive(Clone)]
pub struct OrganizerService {
    repository: DynOrganizerRepository,
    tracer: OperationTracer,
}

impl OrganizerService {
    pub fn new(repository: DynOrganizerRepository, tracer: OperationTracer) -> Self {
        Self { repository, tracer }
    }
}

#[async_trait]
impl OrganizerServiceTrait for OrganizerService {
    async fn set_webhook(
        &self,
        actor: &Actor,
        req: &WebhookRequest,
    ) -> Result<ApiResponse<OrganizerSettingsResponse>, ServiceError> {
        let ctx = self.tracer.start(
            "SetWebhook",
            vec![
                KeyValue::new("component", "organizer"),
                KeyValue::new("organizer.id", actor.user_id.to_string()),
            ],
        );

        let result: Result<_, ServiceError> = async {
            actor.require_role(Role::Organizer)?;
            req.validate().map_err(invalid)?;

            let url = req
                .webhook_url
                .as_deref()
                .map(str::trim)
                .filter(|u| !u.is_empty());
            let settings = self.repository.upsert_webhook(actor.user_id, url).await?;

            info!(
                "🔗 Organizer {} webhook {}",
                actor.user_id,
                if settings.webhook_url.is_some() { "set" } else { "cleared" }
            );

            Ok(ApiResponse::success(
                "Webhook updated",
                OrganizerSettingsResponse::from(settings),
            ))
        }
        .await;

        self.tracer.finish(&ctx, result, "Webhook saved")
    }
}
