use crate::{
    abstract_trait::{
        event::repository::DynEventQueryRepository,
        notify::DynCredentialEncoder,
        registration::{
            repository::{DynRegistrationCommandRepository, DynRegistrationQueryRepository},
            service::AttendanceServiceTrait,
        },
    },
    domain::{
        identity::Actor,
        requests::attendance::CheckInRequest,
        response::{
            api::ApiResponse,
            attendance::{AttendanceResponse, AttendanceSummaryResponse, AttendeeResponse},
        },
    },
    service::{load_event, validation::invalid},
};
use async_trait::async_trait;
use chrono::Utc;
use opentelemetry::KeyValue;
use shared::{errors::ServiceError, utils::OperationTracer};
use tracing::{info, warn};
use validator::Validate;

pub struct AttendanceServiceDeps {
    pub events: DynEventQueryRepository,
    pub query: DynRegistrationQueryRepository,
    pub command: DynRegistrationCommandRepository,
    pub encoder: DynCredentialEncoder,
    pub tracer: OperationTracer,
}

#[derive(Clone)]
pub struct AttendanceService {
    events: DynEventQueryRepository,
    query: DynRegistrationQueryRepository,
    command: DynRegistrationCommandRepository,
    encoder: DynCredentialEncoder,
    tracer: OperationTracer,
}

impl AttendanceService {
    pub fn new(deps: AttendanceServiceDeps) -> Self {
        let AttendanceServiceDeps {
            events,
            query,
            command,
            encoder,
            tracer,
        } = deps;

        Self {
            events,
            query,
            command,
            encoder,
            tracer,
        }
    }

    /// The ticket id a check-in refers to. A scanned credential must have
    /// been issued for this very event.
    fn presented_ticket(&self, event_id: i32, req: &CheckInRequest) -> Result<String, ServiceError> {
        if let Some(credential) = &req.credential {
            let payload = self.encoder.decode(credential)?;
            if payload.event_id != event_id {
                warn!(
                    "🎟️ Ticket {} belongs to event {}, scanned at event {}",
                    payload.ticket_id, payload.event_id, event_id
                );
                return Err(ServiceError::InvalidTicket);
            }
            return Ok(payload.ticket_id);
        }

        req.ticket_id
            .as_ref()
            .map(|t| t.trim().to_uppercase())
            .filter(|t| !t.is_empty())
            .ok_or(ServiceError::InvalidTicket)
    }

    async fn mark(
        &self,
        actor: &Actor,
        event_id: i32,
        req: &CheckInRequest,
    ) -> Result<ApiResponse<AttendanceResponse>, ServiceError> {
        req.validate().map_err(invalid)?;

        let event = load_event(&self.events, event_id).await?;
        actor.require_manager(&event)?;

        let ticket_id = self.presented_ticket(event_id, req)?;
        let registration = self
            .query
            .find_by_ticket(event_id, &ticket_id)
            .await?
            .ok_or(ServiceError::InvalidTicket)?;

        let marked = self
            .command
            .mark_attended(registration.registration_id, actor.user_id, Utc::now())
            .await?;

        let attended_at = marked.attended_at.unwrap_or_else(Utc::now);
        info!(
            "✅ Ticket {} checked in at event {} by {}",
            ticket_id, event_id, actor.user_id
        );

        Ok(ApiResponse::success(
            "Attendance marked",
            AttendanceResponse {
                registration_id: marked.registration_id,
                event_id,
                ticket_id,
                participant_id: marked.participant_id,
                participant_name: marked.participant_name,
                attended_at,
                marked_by: marked.attendance_marked_by,
            },
        ))
    }

    async fn build_summary(
        &self,
        actor: &Actor,
        event_id: i32,
    ) -> Result<ApiResponse<AttendanceSummaryResponse>, ServiceError> {
        let event = load_event(&self.events, event_id).await?;
        actor.require_manager(&event)?;

        let stats = self.query.aggregate_stats(event_id).await?;
        let attendees = self.query.find_attendees(event_id).await?;

        Ok(ApiResponse::success(
            "Attendance summary retrieved",
            AttendanceSummaryResponse {
                event_id,
                confirmed_total: stats.confirmed,
                attended: stats.attended,
                not_attended: (stats.confirmed - stats.attended).max(0),
                attendees: attendees.into_iter().map(AttendeeResponse::from).collect(),
            },
        ))
    }
}

#[async_trait]
impl AttendanceServiceTrait for AttendanceService {
    async fn check_in(
        &self,
        actor: &Actor,
        event_id: i32,
        req: &CheckInRequest,
    ) -> Result<ApiResponse<AttendanceResponse>, ServiceError> {
        let ctx = self.tracer.start(
            "MarkAttendance",
            vec![
                KeyValue::new("component", "attendance"),
                KeyValue::new("event.id", event_id.to_string()),
                KeyValue::new("operator.id", actor.user_id.to_string()),
            ],
        );

        let result = self.mark(actor, event_id, req).await;
        self.tracer.finish(&ctx, result, "Attendance marked")
    }

    async fn summary(
        &self,
        actor: &Actor,
        event_id: i32,
    ) -> Result<ApiResponse<AttendanceSummaryResponse>, ServiceError> {
        let ctx = self.tracer.start(
            "AttendanceSummary",
            vec![
                KeyValue::new("component", "attendance"),
                KeyValue::new("event.id", event_id.to_string()),
            ],
        );

        let result = self.build_summary(actor, event_id).await;
        self.tracer.finish(&ctx, result, "Attendance summary built")
    }
}
