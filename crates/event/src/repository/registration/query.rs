use crate::{
    abstract_trait::registration::repository::RegistrationQueryRepositoryTrait,
    domain::requests::registration::RegistrationFilter,
    model::registration::{Registration as RegistrationModel, RegistrationStats, RegistrationStatus},
    repository::registration::REGISTRATION_COLUMNS,
};
use async_trait::async_trait;
use shared::{config::ConnectionPool, errors::RepositoryError};
use sqlx::{FromRow, Row};
use tracing::{error, info};

#[derive(Clone)]
pub struct RegistrationQueryRepository {
    db: ConnectionPool,
}

impl RegistrationQueryRepository {
    pub fn new(db: ConnectionPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl RegistrationQueryRepositoryTrait for RegistrationQueryRepository {
    async fn find_by_id(
        &self,
        registration_id: i32,
    ) -> Result<Option<RegistrationModel>, RepositoryError> {
        sqlx::query_as::<_, RegistrationModel>(&format!(
            "SELECT {REGISTRATION_COLUMNS} FROM registrations WHERE registration_id = $1"
        ))
        .bind(registration_id)
        .fetch_optional(&self.db)
        .await
        .map_err(|e| {
            error!("❌ Failed to fetch registration {}: {:?}", registration_id, e);
            RepositoryError::from(e)
        })
    }

    async fn find_by_participant_and_event(
        &self,
        participant_id: i32,
        event_id: i32,
    ) -> Result<Option<RegistrationModel>, RepositoryError> {
        sqlx::query_as::<_, RegistrationModel>(&format!(
            "SELECT {REGISTRATION_COLUMNS} FROM registrations \
             WHERE participant_id = $1 AND event_id = $2"
        ))
        .bind(participant_id)
        .bind(event_id)
        .fetch_optional(&self.db)
        .await
        .map_err(|e| {
            error!(
                "❌ Failed to fetch registration of participant {} for event {}: {:?}",
                participant_id, event_id, e
            );
            RepositoryError::from(e)
        })
    }

    async fn find_by_ticket(
        &self,
        event_id: i32,
        ticket_id: &str,
    ) -> Result<Option<RegistrationModel>, RepositoryError> {
        sqlx::query_as::<_, RegistrationModel>(&format!(
            "SELECT {REGISTRATION_COLUMNS} FROM registrations \
             WHERE event_id = $1 AND ticket_id = $2"
        ))
        .bind(event_id)
        .bind(ticket_id)
        .fetch_optional(&self.db)
        .await
        .map_err(|e| {
            error!("❌ Failed to look up ticket {} for event {}: {:?}", ticket_id, event_id, e);
            RepositoryError::from(e)
        })
    }

    async fn find_by_event(
        &self,
        filter: &RegistrationFilter,
    ) -> Result<(Vec<RegistrationModel>, i64), RepositoryError> {
        info!("🔍 Fetching registrations with filter: {:?}", filter);

        let (limit, offset) = filter.limit_offset();
        let search = filter
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty());

        let rows = sqlx::query(&format!(
            r#"
            SELECT {REGISTRATION_COLUMNS}, COUNT(*) OVER() AS total_count
            FROM registrations
            WHERE event_id = $1
              AND ($2::TEXT IS NULL OR status = $2)
              AND ($3::TEXT IS NULL
                   OR participant_name ILIKE '%' || $3 || '%'
                   OR participant_email ILIKE '%' || $3 || '%')
            ORDER BY created_at DESC, registration_id DESC
            LIMIT $4 OFFSET $5
            "#
        ))
        .bind(filter.event_id)
        .bind(filter.status.map(|s| s.as_str()))
        .bind(search)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.db)
        .await
        .map_err(|e| {
            error!(
                "❌ Failed to fetch registrations for event {}: {:?}",
                filter.event_id, e
            );
            RepositoryError::from(e)
        })?;

        let total = match rows.first() {
            Some(row) => row.try_get::<i64, _>("total_count")?,
            None => 0,
        };

        let registrations = rows
            .iter()
            .map(RegistrationModel::from_row)
            .collect::<Result<Vec<_>, _>>()?;

        Ok((registrations, total))
    }

    async fn find_by_participant(
        &self,
        participant_id: i32,
    ) -> Result<Vec<RegistrationModel>, RepositoryError> {
        sqlx::query_as::<_, RegistrationModel>(&format!(
            "SELECT {REGISTRATION_COLUMNS} FROM registrations \
             WHERE participant_id = $1 ORDER BY created_at DESC, registration_id DESC"
        ))
        .bind(participant_id)
        .fetch_all(&self.db)
        .await
        .map_err(|e| {
            error!(
                "❌ Failed to fetch registrations of participant {}: {:?}",
                participant_id, e
            );
            RepositoryError::from(e)
        })
    }

    async fn find_attendees(
        &self,
        event_id: i32,
    ) -> Result<Vec<RegistrationModel>, RepositoryError> {
        sqlx::query_as::<_, RegistrationModel>(&format!(
            "SELECT {REGISTRATION_COLUMNS} FROM registrations \
             WHERE event_id = $1 AND attended = TRUE \
             ORDER BY attended_at DESC, registration_id DESC"
        ))
        .bind(event_id)
        .fetch_all(&self.db)
        .await
        .map_err(|e| {
            error!("❌ Failed to fetch attendees for event {}: {:?}", event_id, e);
            RepositoryError::from(e)
        })
    }

    async fn aggregate_stats(&self, event_id: i32) -> Result<RegistrationStats, RepositoryError> {
        let rows: Vec<(String, i64, i64, i64)> = sqlx::query_as(
            r#"
            SELECT status,
                   COUNT(*)::BIGINT                          AS count,
                   COUNT(*) FILTER (WHERE attended)::BIGINT  AS attended,
                   COALESCE(SUM(total_amount), 0)::BIGINT    AS amount
            FROM registrations
            WHERE event_id = $1
            GROUP BY status
            "#,
        )
        .bind(event_id)
        .fetch_all(&self.db)
        .await
        .map_err(|e| {
            error!("❌ Failed to aggregate registrations for event {}: {:?}", event_id, e);
            RepositoryError::from(e)
        })?;

        let mut stats = RegistrationStats::default();
        for (status, count, attended, amount) in rows {
            let status = RegistrationStatus::try_from(status)
                .map_err(|e| RepositoryError::Custom(e.to_string()))?;
            stats.accumulate(status, count, attended, amount);
        }

        Ok(stats)
    }
}
