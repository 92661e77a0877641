use crate::{
    abstract_trait::feedback::FeedbackRepositoryTrait,
    domain::requests::feedback::NewFeedback, model::feedback::Feedback,
};
use async_trait::async_trait;
use shared::{config::ConnectionPool, errors::RepositoryError};
use tracing::{error, info};

#[derive(Clone)]
pub struct FeedbackRepository {
    db: ConnectionPool,
}

impl FeedbackRepository {
    pub fn new(db: ConnectionPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl FeedbackRepositoryTrait for FeedbackRepository {
    async fn create(&self, feedback: &NewFeedback) -> Result<Feedback, RepositoryError> {
        let created = sqlx::query_as::<_, Feedback>(
            r#"
            INSERT INTO event_feedback (event_id, participant_id, rating, comment)
            VALUES ($1, $2, $3, $4)
            RETURNING feedback_id, event_id, participant_id, rating, comment, created_at
            "#,
        )
        .bind(feedback.event_id)
        .bind(feedback.participant_id)
        .bind(feedback.rating)
        .bind(feedback.comment.as_deref())
        .fetch_one(&self.db)
        .await
        .map_err(|e| {
            error!(
                "❌ Failed to store feedback of participant {} for event {}: {:?}",
                feedback.participant_id, feedback.event_id, e
            );
            RepositoryError::from(e)
        })?;

        info!(
            "⭐ Feedback {} stored for event {}",
            created.feedback_id, created.event_id
        );
        Ok(created)
    }

    async fn find_by_event(
        &self,
        event_id: i32,
        rating: Option<i32>,
    ) -> Result<Vec<Feedback>, RepositoryError> {
        sqlx::query_as::<_, Feedback>(
            r#"
            SELECT feedback_id, event_id, participant_id, rating, comment, created_at
            FROM event_feedback
            WHERE event_id = $1
              AND ($2::INT IS NULL OR rating = $2)
            ORDER BY created_at DESC, feedback_id DESC
            "#,
        )
        .bind(event_id)
        .bind(rating)
        .fetch_all(&self.db)
        .await
        .map_err(|e| {
            error!("❌ Failed to fetch feedback for event {}: {:?}", event_id, e);
            RepositoryError::from(e)
        })
    }

    async fn rating_counts(&self, event_id: i32) -> Result<Vec<(i32, i64)>, RepositoryError> {
        sqlx::query_as::<_, (i32, i64)>(
            r#"
            SELECT rating, COUNT(*)
            FROM event_feedback
            WHERE event_id = $1
            GROUP BY rating
            ORDER BY rating
            "#,
        )
        .bind(event_id)
        .fetch_all(&self.db)
        .await
        .map_err(|e| {
            error!("❌ Failed to aggregate feedback for event {}: {:?}", event_id, e);
            RepositoryError::from(e)
        })
    }
}
