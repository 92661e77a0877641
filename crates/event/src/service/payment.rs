use crate::{
    abstract_trait::{
        event::repository::DynEventQueryRepository,
        notify::DynCredentialEncoder,
        registration::{
            repository::{DynRegistrationCommandRepository, DynRegistrationQueryRepository},
            service::PaymentServiceTrait,
        },
    },
    domain::{
        identity::Actor,
        requests::{
            payment::{PaymentProofRequest, ReviewPaymentRequest},
            registration::PaymentReview,
        },
        response::{api::ApiResponse, registration::RegistrationResponse},
    },
    model::{
        event::Event,
        registration::{PaymentStatus, Registration},
    },
    service::{
        credential::issue_ticket, load_event, load_registration, notify::Notifications,
        validation::invalid,
    },
};
use async_trait::async_trait;
use chrono::Utc;
use opentelemetry::KeyValue;
use shared::{errors::ServiceError, utils::OperationTracer};
use tracing::info;
use validator::Validate;

pub struct PaymentServiceDeps {
    pub events: DynEventQueryRepository,
    pub query: DynRegistrationQueryRepository,
    pub command: DynRegistrationCommandRepository,
    pub encoder: DynCredentialEncoder,
    pub notifications: Notifications,
    pub tracer: OperationTracer,
}

#[derive(Clone)]
pub struct PaymentService {
    events: DynEventQueryRepository,
    query: DynRegistrationQueryRepository,
    command: DynRegistrationCommandRepository,
    encoder: DynCredentialEncoder,
    notifications: Notifications,
    tracer: OperationTracer,
}

impl PaymentService {
    pub fn new(deps: PaymentServiceDeps) -> Self {
        let PaymentServiceDeps {
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

    /// Loads a registration under review. Only the event's own organizer
    /// reviews payments, and only while they are pending.
    async fn reviewable(
        &self,
        actor: &Actor,
        registration_id: i32,
    ) -> Result<(Registration, Event), ServiceError> {
        let registration = load_registration(&self.query, registration_id).await?;
        let event = load_event(&self.events, registration.event_id).await?;

        if !actor.owns(&event) {
            return Err(ServiceError::Unauthorized(
                "Only the event's organizer may review payments".into(),
            ));
        }
        if registration.payment_status != PaymentStatus::Pending {
            return Err(ServiceError::AlreadyReviewed);
        }

        Ok((registration, event))
    }

    fn review(actor: &Actor, registration_id: i32, req: &ReviewPaymentRequest) -> PaymentReview {
        PaymentReview {
            registration_id,
            reviewer_id: actor.user_id,
            comment: req
                .comment
                .as_ref()
                .map(|c| c.trim().to_string())
                .filter(|c| !c.is_empty()),
            reviewed_at: Utc::now(),
        }
    }

    async fn attach(
        &self,
        actor: &Actor,
        registration_id: i32,
        req: &PaymentProofRequest,
    ) -> Result<ApiResponse<RegistrationResponse>, ServiceError> {
        req.validate().map_err(invalid)?;

        let registration = load_registration(&self.query, registration_id).await?;
        if registration.participant_id != actor.user_id {
            return Err(ServiceError::Unauthorized(
                "Only the registrant may upload a payment proof".into(),
            ));
        }

        let updated = self
            .command
            .attach_payment_proof(registration_id, &req.payment_proof)
            .await?;

        Ok(ApiResponse::success(
            "Payment proof submitted",
            RegistrationResponse::from(updated),
        ))
    }

    async fn approve_pending(
        &self,
        actor: &Actor,
        registration_id: i32,
        req: &ReviewPaymentRequest,
    ) -> Result<ApiResponse<RegistrationResponse>, ServiceError> {
        req.validate().map_err(invalid)?;
        let (registration, event) = self.reviewable(actor, registration_id).await?;

        let ticket = issue_ticket(
            &self.encoder,
            &event,
            registration.participant_id,
            &registration.participant_name,
        )?;
        let approved = self
            .command
            .approve_payment(&Self::review(actor, registration_id, req), &ticket)
            .await?;

        info!(
            "✅ Payment for registration {} approved by {}, ticket {}",
            registration_id, actor.user_id, ticket.ticket_id
        );
        self.notifications.ticket_issued(&event, &approved);

        Ok(ApiResponse::success(
            "Payment approved",
            RegistrationResponse::from(approved),
        ))
    }

    async fn reject_pending(
        &self,
        actor: &Actor,
        registration_id: i32,
        req: &ReviewPaymentRequest,
    ) -> Result<ApiResponse<RegistrationResponse>, ServiceError> {
        req.validate().map_err(invalid)?;
        self.reviewable(actor, registration_id).await?;

        let rejected = self
            .command
            .reject_payment(&Self::review(actor, registration_id, req))
            .await?;

        info!(
            "🚫 Payment for registration {} rejected by {}",
            registration_id, actor.user_id
        );

        Ok(ApiResponse::success(
            "Payment rejected",
            RegistrationResponse::from(rejected),
        ))
    }
}

#[async_trait]
impl PaymentServiceTrait for PaymentService {
    async fn submit_proof(
        &self,
        actor: &Actor,
        registration_id: i32,
        req: &PaymentProofRequest,
    ) -> Result<ApiResponse<RegistrationResponse>, ServiceError> {
        let ctx = self.tracer.start(
            "SubmitPaymentProof",
            vec![
                KeyValue::new("component", "payment"),
                KeyValue::new("registration.id", registration_id.to_string()),
            ],
        );

        let result = self.attach(actor, registration_id, req).await;
        self.tracer.finish(&ctx, result, "Payment proof attached")
    }

    async fn approve(
        &self,
        actor: &Actor,
        registration_id: i32,
        req: &ReviewPaymentRequest,
    ) -> Result<ApiResponse<RegistrationResponse>, ServiceError> {
        let ctx = self.tracer.start(
            "ApprovePayment",
            vec![
                KeyValue::new("component", "payment"),
                KeyValue::new("registration.id", registration_id.to_string()),
                KeyValue::new("reviewer.id", actor.user_id.to_string()),
            ],
        );

        let result = self.approve_pending(actor, registration_id, req).await;
        self.tracer.finish(&ctx, result, "Payment approved")
    }

    async fn reject(
        &self,
        actor: &Actor,
        registration_id: i32,
        req: &ReviewPaymentRequest,
    ) -> Result<ApiResponse<RegistrationResponse>, ServiceError> {
        let ctx = self.tracer.start(
            "RejectPayment",
            vec![
                KeyValue::new("component", "payment"),
                KeyValue::new("registration.id", registration_id.to_string()),
                KeyValue::new("reviewer.id", actor.user_id.to_string()),
            ],
        );

        let result = self.reject_pending(actor, registration_id, req).await;
        self.tracer.finish(&ctx, result, "Payment rejected")
    }
}
