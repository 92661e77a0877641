use crate::{
    abstract_trait::{
        event::repository::DynEventQueryRepository,
        registration::{
            repository::{DynRegistrationCommandRepository, DynRegistrationQueryRepository},
            service::RegistrationServiceTrait,
        },
    },
    domain::{
        identity::{Actor, Role},
        requests::registration::{FindAllRegistrations, RegistrationFilter},
        response::{
            api::{ApiResponse, ApiResponsePagination},
            pagination::Pagination,
            registration::RegistrationResponse,
        },
    },
    model::{event::Event, registration::Registration},
    service::{load_event, load_registration, validation::invalid},
};
use async_trait::async_trait;
use opentelemetry::KeyValue;
use shared::{errors::ServiceError, utils::OperationTracer};
use tracing::info;
use validator::Validate;

pub struct RegistrationServiceDeps {
    pub events: DynEventQueryRepository,
    pub query: DynRegistrationQueryRepository,
    pub command: DynRegistrationCommandRepository,
    pub tracer: OperationTracer,
}

#[derive(Clone)]
pub struct RegistrationService {
    events: DynEventQueryRepository,
    query: DynRegistrationQueryRepository,
    command: DynRegistrationCommandRepository,
    tracer: OperationTracer,
}

/// The registrant, the event's organizer, or an admin.
fn require_party(actor: &Actor, registration: &Registration, event: &Event) -> Result<(), ServiceError> {
    if registration.participant_id == actor.user_id && actor.role == Role::Participant {
        return Ok(());
    }
    actor.require_manager(event)
}

impl RegistrationService {
    pub fn new(deps: RegistrationServiceDeps) -> Self {
        let RegistrationServiceDeps {
            events,
            query,
            command,
            tracer,
        } = deps;

        Self {
            events,
            query,
            command,
            tracer,
        }
    }

    async fn load_with_event(
        &self,
        actor: &Actor,
        registration_id: i32,
    ) -> Result<Registration, ServiceError> {
        let registration = load_registration(&self.query, registration_id).await?;
        let event = load_event(&self.events, registration.event_id).await?;
        require_party(actor, &registration, &event)?;
        Ok(registration)
    }
}

#[async_trait]
impl RegistrationServiceTrait for RegistrationService {
    async fn my_registrations(
        &self,
        actor: &Actor,
    ) -> Result<ApiResponse<Vec<RegistrationResponse>>, ServiceError> {
        let ctx = self.tracer.start(
            "MyRegistrations",
            vec![
                KeyValue::new("component", "registration"),
                KeyValue::new("participant.id", actor.user_id.to_string()),
            ],
        );

        let result: Result<_, ServiceError> = async {
            actor.require_role(Role::Participant)?;
            let registrations = self.query.find_by_participant(actor.user_id).await?;
            Ok(ApiResponse::success(
                "Registrations retrieved successfully",
                registrations
                    .into_iter()
                    .map(RegistrationResponse::from)
                    .collect(),
            ))
        }
        .await;

        self.tracer.finish(&ctx, result, "Own registrations listed")
    }

    async fn event_registrations(
        &self,
        actor: &Actor,
        event_id: i32,
        req: &FindAllRegistrations,
    ) -> Result<ApiResponsePagination<Vec<RegistrationResponse>>, ServiceError> {
        let ctx = self.tracer.start(
            "EventRegistrations",
            vec![
                KeyValue::new("component", "registration"),
                KeyValue::new("event.id", event_id.to_string()),
                KeyValue::new("page", req.page.to_string()),
            ],
        );

        let result: Result<_, ServiceError> = async {
            req.validate().map_err(invalid)?;
            let event = load_event(&self.events, event_id).await?;
            actor.require_manager(&event)?;

            let filter = RegistrationFilter {
                event_id,
                status: req.status,
                search: req.search.clone(),
                page: req.page,
                page_size: req.page_size,
            };
            let (registrations, total) = self.query.find_by_event(&filter).await?;

            Ok(ApiResponsePagination {
                status: "success".into(),
                message: "Registrations retrieved successfully".into(),
                data: registrations
                    .into_iter()
                    .map(RegistrationResponse::from)
                    .collect(),
                pagination: Pagination::new(req.page, req.page_size, total),
            })
        }
        .await;

        self.tracer.finish(&ctx, result, "Event registrations listed")
    }

    async fn find_by_id(
        &self,
        actor: &Actor,
        registration_id: i32,
    ) -> Result<ApiResponse<RegistrationResponse>, ServiceError> {
        let ctx = self.tracer.start(
            "GetRegistration",
            vec![
                KeyValue::new("component", "registration"),
                KeyValue::new("registration.id", registration_id.to_string()),
            ],
        );

        let result: Result<_, ServiceError> = async {
            let registration = self.load_with_event(actor, registration_id).await?;
            Ok(ApiResponse::success(
                "Registration retrieved successfully",
                RegistrationResponse::from(registration),
            ))
        }
        .await;

        self.tracer.finish(&ctx, result, "Registration retrieved")
    }

    async fn cancel(
        &self,
        actor: &Actor,
        registration_id: i32,
    ) -> Result<ApiResponse<RegistrationResponse>, ServiceError> {
        let ctx = self.tracer.start(
            "CancelRegistration",
            vec![
                KeyValue::new("component", "registration"),
                KeyValue::new("registration.id", registration_id.to_string()),
                KeyValue::new("actor.id", actor.user_id.to_string()),
            ],
        );

        let result: Result<_, ServiceError> = async {
            self.load_with_event(actor, registration_id).await?;
            let cancelled = self.command.cancel(registration_id).await?;

            info!(
                "🗑️ Registration {} for event {} cancelled by {}",
                registration_id, cancelled.event_id, actor.user_id
            );

            Ok(ApiResponse::success(
                "Registration cancelled",
                RegistrationResponse::from(cancelled),
            ))
        }
        .await;

        self.tracer.finish(&ctx, result, "Registration cancelled")
    }
}
