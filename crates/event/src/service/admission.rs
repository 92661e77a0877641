use crate::{
    abstract_trait::{
        event::repository::DynEventQueryRepository,
        notify::DynCredentialEncoder,
        registration::{
            repository::{DynRegistrationCommandRepository, DynRegistrationQueryRepository},
            service::AdmissionServiceTrait,
        },
    },
    domain::{
        identity::{Actor, Role},
        requests::registration::{NewRegistration, RegisterRequest},
        response::{api::ApiResponse, registration::RegistrationResponse},
    },
    model::{
        event::{Event, EventKind},
        registration::{PaymentStatus, RegistrationStatus},
    },
    service::{
        credential::issue_ticket,
        load_event,
        notify::Notifications,
        validation::{invalid, resolve_selections, total_amount, validate_form_responses},
    },
};
use async_trait::async_trait;
use chrono::Utc;
use opentelemetry::KeyValue;
use shared::{errors::ServiceError, utils::OperationTracer};
use tracing::info;
use validator::Validate;

pub struct AdmissionServiceDeps {
    pub events: DynEventQueryRepository,
    pub query: DynRegistrationQueryRepository,
    pub command: DynRegistrationCommandRepository,
    pub encoder: DynCredentialEncoder,
    pub notifications: Notifications,
    pub tracer: OperationTracer,
}

#[derive(Clone)]
pub struct AdmissionService {
    events: DynEventQueryRepository,
    query: DynRegistrationQueryRepository,
    command: DynRegistrationCommandRepository,
    encoder: DynCredentialEncoder,
    notifications: Notifications,
    tracer: OperationTracer,
}

/// Paid merchandise waits for a reviewed payment proof; everything else is
/// confirmed on the spot.
pub fn needs_payment_review(event: &Event, total_amount: i64) -> bool {
    event.kind == EventKind::Merchandise && total_amount > 0
}

/// Admission preconditions that depend only on the event and the caller,
/// in the order they are reported.
pub fn check_admissible(event: &Event, actor: &Actor) -> Result<(), ServiceError> {
    if !event.status.accepts_registrations() {
        return Err(ServiceError::EventNotOpen);
    }
    if Utc::now() > event.registration_deadline {
        return Err(ServiceError::DeadlinePassed);
    }
    if !event.has_capacity() {
        return Err(ServiceError::CapacityExceeded);
    }
    if !actor.is_eligible_for(event.eligibility) {
        return Err(ServiceError::NotEligible(event.eligibility.to_string()));
    }
    Ok(())
}

impl AdmissionService {
    pub fn new(deps: AdmissionServiceDeps) -> Self {
        let AdmissionServiceDeps {
            events,
            query,
            command,
            encoder,
            notifications,
            tracer,
        } = deps;

        Self {
            events,
            query,
            command,
            encoder,
            notifications,
            tracer,
        }
    }

    async fn admit(
        &self,
        actor: &Actor,
        event_id: i32,
        req: &RegisterRequest,
    ) -> Result<ApiResponse<RegistrationResponse>, ServiceError> {
        actor.require_role(Role::Participant)?;
        req.validate().map_err(invalid)?;

        let event = load_event(&self.events, event_id).await?;
        check_admissible(&event, actor)?;

        if self
            .query
            .find_by_participant_and_event(actor.user_id, event_id)
            .await?
            .is_some()
        {
            return Err(ServiceError::AlreadyRegistered);
        }

        validate_form_responses(&event.form_fields, &req.form_responses)?;
        let selections = resolve_selections(&event, &req.selections)?;
        let total = total_amount(event.registration_fee, &selections)?;

        let record = if needs_payment_review(&event, total) {
            NewRegistration {
                event_id,
                participant_id: actor.user_id,
                participant_name: actor.name.clone(),
                participant_email: actor.email.clone(),
                status: RegistrationStatus::PendingPayment,
                payment_status: PaymentStatus::Pending,
                form_responses: req.form_responses.clone(),
                selections,
                payment_proof: req.payment_proof.clone(),
                total_amount: total,
                ticket: None,
            }
        } else {
            NewRegistration {
                event_id,
                participant_id: actor.user_id,
                participant_name: actor.name.clone(),
                participant_email: actor.email.clone(),
                status: RegistrationStatus::Registered,
                payment_status: PaymentStatus::NotRequired,
                form_responses: req.form_responses.clone(),
                selections,
                payment_proof: None,
                total_amount: total,
                ticket: Some(issue_ticket(
                    &self.encoder,
                    &event,
                    actor.user_id,
                    &actor.name,
                )?),
            }
        };

        let registration = self.command.admit(&record).await?;

        let message = if registration.status.is_confirmed() {
            info!(
                "🎟️ Participant {} registered for event {} with ticket {:?}",
                actor.user_id, event_id, registration.ticket_id
            );
            self.notifications.ticket_issued(&event, &registration);
            "Registration successful"
        } else {
            info!(
                "💳 Participant {} awaiting payment review for event {} ({})",
                actor.user_id, event_id, registration.total_amount
            );
            "Registration pending payment review"
        };

        Ok(ApiResponse::success(
            message,
            RegistrationResponse::from(registration),
        ))
    }
}

#[async_trait]
impl AdmissionServiceTrait for AdmissionService {
    async fn register(
        &self,
        actor: &Actor,
        event_id: i32,
        req: &RegisterRequest,
    ) -> Result<ApiResponse<RegistrationResponse>, ServiceError> {
        let ctx = self.tracer.start(
            "RegisterForEvent",
            vec![
                KeyValue::new("component", "registration"),
                KeyValue::new("event.id", event_id.to_string()),
                KeyValue::new("participant.id", actor.user_id.to_string()),
            ],
        );

        let result = self.admit(actor, event_id, req).await;
        self.tracer.finish(&ctx, result, "Registration committed")
    }
}
