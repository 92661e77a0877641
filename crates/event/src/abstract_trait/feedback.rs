use crate::{
    domain::{
        identity::Actor,
        requests::feedback::{FindEventFeedback, NewFeedback, SubmitFeedbackRequest},
        response::{
            api::ApiResponse,
            feedback::{EventFeedbackResponse, FeedbackResponse},
        },
    },
    model::feedback::Feedback,
};
use async_trait::async_trait;
use shared::errors::{RepositoryError, ServiceError};
use std::sync::Arc;

pub type DynFeedbackRepository = Arc<dyn FeedbackRepositoryTrait + Send + Sync>;
pub type DynFeedbackService = Arc<dyn FeedbackServiceTrait + Send + Sync>;

#[async_trait]
pub trait FeedbackRepositoryTrait {
    /// Fails with `AlreadyExists` when the participant already left feedback.
    async fn create(&self, feedback: &NewFeedback) -> Result<Feedback, RepositoryError>;
    /// Newest first.
    async fn find_by_event(
        &self,
        event_id: i32,
        rating: Option<i32>,
    ) -> Result<Vec<Feedback>, RepositoryError>;
    /// `(rating, count)` pairs over all feedback of the event.
    async fn rating_counts(&self, event_id: i32) -> Result<Vec<(i32, i64)>, RepositoryError>;
}

#[async_trait]
pub trait FeedbackServiceTrait {
    async fn submit(
        &self,
        actor: &Actor,
        event_id: i32,
        req: &SubmitFeedbackRequest,
    ) -> Result<ApiResponse<FeedbackResponse>, ServiceError>;
    async fn event_feedback(
        &self,
        actor: &Actor,
        event_id: i32,
        req: &FindEventFeedback,
    ) -> Result<ApiResponse<EventFeedbackResponse>, ServiceError>;
}
