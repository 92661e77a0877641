use crate::{
    abstract_trait::{
        event::repository::DynEventQueryRepository,
        feedback::{DynFeedbackRepository, FeedbackServiceTrait},
        registration::repository::DynRegistrationQueryRepository,
    },
    domain::{
        identity::{Actor, Role},
        requests::feedback::{FindEventFeedback, NewFeedback, SubmitFeedbackRequest},
        response::{
            api::ApiResponse,
            feedback::{EventFeedbackResponse, FeedbackResponse},
        },
    },
    model::{
        event::EventStatus,
        feedback::FeedbackStats,
        registration::{Registration, RegistrationStatus},
    },
    service::{load_event, validation::invalid},
};
use async_trait::async_trait;
use opentelemetry::KeyValue;
use shared::{errors::ServiceError, utils::OperationTracer};
use tracing::info;
use validator::Validate;

pub struct FeedbackServiceDeps {
    pub events: DynEventQueryRepository,
    pub registrations: DynRegistrationQueryRepository,
    pub feedback: DynFeedbackRepository,
    pub tracer: OperationTracer,
}

#[derive(Clone)]
pub struct FeedbackService {
    events: DynEventQueryRepository,
    registrations: DynRegistrationQueryRepository,
    feedback: DynFeedbackRepository,
    tracer: OperationTracer,
}

impl FeedbackService {
    pub fn new(deps: FeedbackServiceDeps) -> Self {
        let FeedbackServiceDeps {
            events,
            registrations,
            feedback,
            tracer,
        } = deps;

        Self {
            events,
            registrations,
            feedback,
            tracer,
        }
    }
}

/// Registrations whose holder took part in the event.
fn may_leave_feedback(registration: Option<&Registration>) -> bool {
    registration.is_some_and(|r| {
        matches!(
            r.status,
            RegistrationStatus::Registered
                | RegistrationStatus::Approved
                | RegistrationStatus::Completed
        )
    })
}

#[async_trait]
impl FeedbackServiceTrait for FeedbackService {
    async fn submit(
        &self,
        actor: &Actor,
        event_id: i32,
        req: &SubmitFeedbackRequest,
    ) -> Result<ApiResponse<FeedbackResponse>, ServiceError> {
        let ctx = self.tracer.start(
            "SubmitFeedback",
            vec![
                KeyValue::new("component", "feedback"),
                KeyValue::new("event.id", event_id.to_string()),
                KeyValue::new("participant.id", actor.user_id.to_string()),
            ],
        );

        let result: Result<_, ServiceError> = async {
            actor.require_role(Role::Participant)?;
            req.validate().map_err(invalid)?;

            let event = load_event(&self.events, event_id).await?;
            if event.status == EventStatus::Draft {
                return Err(ServiceError::NotFound(format!("Event {event_id}")));
            }

            let registration = self
                .registrations
                .find_by_participant_and_event(actor.user_id, event_id)
                .await?;
            if !may_leave_feedback(registration.as_ref()) {
                return Err(ServiceError::Forbidden(
                    "You must have attended this event to leave feedback".into(),
                ));
            }

            let comment = req
                .comment
                .as_deref()
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .map(str::to_string);
            let feedback = self
                .feedback
                .create(&NewFeedback {
                    event_id,
                    participant_id: actor.user_id,
                    rating: req.rating,
                    comment,
                })
                .await?;

            info!(
                "⭐ Participant {} rated event {} with {}",
                actor.user_id, event_id, feedback.rating
            );

            Ok(ApiResponse::success(
                "Feedback submitted",
                FeedbackResponse::from(feedback),
            ))
        }
        .await;

        self.tracer.finish(&ctx, result, "Feedback submitted")
    }

    async fn event_feedback(
        &self,
        actor: &Actor,
        event_id: i32,
        req: &FindEventFeedback,
    ) -> Result<ApiResponse<EventFeedbackResponse>, ServiceError> {
        let ctx = self.tracer.start(
            "EventFeedback",
            vec![
                KeyValue::new("component", "feedback"),
                KeyValue::new("event.id", event_id.to_string()),
            ],
        );

        let result: Result<_, ServiceError> = async {
            req.validate().map_err(invalid)?;
            let event = load_event(&self.events, event_id).await?;
            actor.require_manager(&event)?;

            let feedbacks = self.feedback.find_by_event(event_id, req.rating).await?;
            let stats = FeedbackStats::from_counts(self.feedback.rating_counts(event_id).await?);

            Ok(ApiResponse::success(
                "Event feedback retrieved",
                EventFeedbackResponse {
                    feedbacks: feedbacks.into_iter().map(FeedbackResponse::from).collect(),
                    stats: stats.into(),
                },
            ))
        }
        .await;

        self.tracer.finish(&ctx, result, "Event feedback retrieved")
    }
}
