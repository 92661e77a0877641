use crate::model::feedback::{Feedback, FeedbackStats, MIN_RATING};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Feedback is shown to organizers without the author.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FeedbackResponse {
    pub id: i32,
    pub event_id: i32,
    pub rating: i32,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<Feedback> for FeedbackResponse {
    fn from(value: Feedback) -> Self {
        FeedbackResponse {
            id: value.feedback_id,
            event_id: value.event_id,
            rating: value.rating,
            comment: value.comment,
            created_at: value.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RatingCount {
    pub rating: i32,
    pub count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FeedbackStatsResponse {
    pub total_feedbacks: i64,
    pub average_rating: f64,
    pub rating_distribution: Vec<RatingCount>,
}

impl From<FeedbackStats> for FeedbackStatsResponse {
    fn from(value: FeedbackStats) -> Self {
        FeedbackStatsResponse {
            total_feedbacks: value.total,
            average_rating: value.average_rating,
            rating_distribution: value
                .distribution
                .iter()
                .zip(MIN_RATING..)
                .map(|(&count, rating)| RatingCount { rating, count })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct EventFeedbackResponse {
    pub feedbacks: Vec<FeedbackResponse>,
    pub stats: FeedbackStatsResponse,
}
