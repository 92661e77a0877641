use crate::{
    abstract_trait::organizer::OrganizerRepositoryTrait, model::organizer::OrganizerSettings,
};
use async_trait::async_trait;
use shared::{config::ConnectionPool, errors::RepositoryError};
use tracing::{error, info};

#[derive(Clone)]
pub struct OrganizerRepository {
    db: ConnectionPool,
}

impl OrganizerRepository {
    pub fn new(db: ConnectionPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl OrganizerRepositoryTrait for OrganizerRepository {
    async fn find_webhook(&self, organizer_id: i32) -> Result<Option<String>, RepositoryError> {
        let url: Option<Option<String>> = sqlx::query_scalar(
            "SELECT webhook_url FROM organizer_settings WHERE organizer_id = $1",
        )
        .bind(organizer_id)
        .fetch_optional(&self.db)
        .await
        .map_err(|e| {
            error!("❌ Failed to read webhook of organizer {}: {:?}", organizer_id, e);
            RepositoryError::from(e)
        })?;

        Ok(url.flatten())
    }

    async fn upsert_webhook(
        &self,
        organizer_id: i32,
        webhook_url: Option<&str>,
    ) -> Result<OrganizerSettings, RepositoryError> {
        let settings = sqlx::query_as::<_, OrganizerSettings>(
            r#"
            INSERT INTO organizer_settings (organizer_id, webhook_url, updated_at)
            VALUES ($1, $2, CURRENT_TIMESTAMP)
            ON CONFLICT (organizer_id)
            DO UPDATE SET webhook_url = EXCLUDED.webhook_url,
                          updated_at  = CURRENT_TIMESTAMP
            RETURNING organizer_id, webhook_url, updated_at
            "#,
        )
        .bind(organizer_id)
        .bind(webhook_url)
        .fetch_one(&self.db)
        .await
        .map_err(|e| {
            error!("❌ Failed to store webhook of organizer {}: {:?}", organizer_id, e);
            RepositoryError::from(e)
        })?;

        info!("🔗 Webhook updated for organizer {}", organizer_id);
        Ok(settings)
    }
}
