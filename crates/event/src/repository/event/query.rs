use crate::{
    abstract_trait::event::repository::EventQueryRepositoryTrait,
    domain::requests::event::EventFilter,
    model::event::Event as EventModel,
    repository::event::{EVENT_COLUMNS, load_items},
};
use async_trait::async_trait;
use shared::{config::ConnectionPool, errors::RepositoryError};
use sqlx::{FromRow, Row};
use tracing::{error, info};

#[derive(Clone)]
pub struct EventQueryRepository {
    db: ConnectionPool,
}

impl EventQueryRepository {
    pub fn new(db: ConnectionPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl EventQueryRepositoryTrait for EventQueryRepository {
    async fn find_by_id(&self, event_id: i32) -> Result<Option<EventModel>, RepositoryError> {
        let mut conn = self.db.acquire().await.map_err(|e| {
            error!("❌ Failed to acquire DB connection: {:?}", e);
            RepositoryError::from(e)
        })?;

        let event = sqlx::query_as::<_, EventModel>(&format!(
            "SELECT {EVENT_COLUMNS} FROM events WHERE event_id = $1"
        ))
        .bind(event_id)
        .fetch_optional(&mut *conn)
        .await
        .map_err(|e| {
            error!("❌ Failed to fetch event {}: {:?}", event_id, e);
            RepositoryError::from(e)
        })?;

        let Some(mut event) = event else {
            info!("❌ Event {} not found", event_id);
            return Ok(None);
        };

        event.items = load_items(&mut *conn, &[event_id])
            .await?
            .remove(&event_id)
            .unwrap_or_default();

        Ok(Some(event))
    }

    async fn find_all(
        &self,
        filter: &EventFilter,
    ) -> Result<(Vec<EventModel>, i64), RepositoryError> {
        info!("🔍 Fetching events with filter: {:?}", filter);

        let mut conn = self.db.acquire().await.map_err(|e| {
            error!("❌ Failed to acquire DB connection: {:?}", e);
            RepositoryError::from(e)
        })?;

        let (limit, offset) = filter.limit_offset();

        let search = filter
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty());
        let statuses: Vec<String> = filter
            .statuses
            .iter()
            .map(|status| status.as_str().to_string())
            .collect();

        let rows = sqlx::query(&format!(
            r#"
            SELECT {EVENT_COLUMNS}, COUNT(*) OVER() AS total_count
            FROM events e
            LEFT JOIN LATERAL (
                SELECT COUNT(*) AS recent_count
                FROM registrations rg
                WHERE rg.event_id = e.event_id AND rg.created_at >= $8
            ) recent ON TRUE
            WHERE ($1::TEXT IS NULL
                   OR e.name ILIKE '%' || $1 || '%'
                   OR e.description ILIKE '%' || $1 || '%'
                   OR EXISTS (SELECT 1 FROM unnest(e.tags) AS tag WHERE tag ILIKE '%' || $1 || '%'))
              AND ($2::TEXT IS NULL OR e.kind = $2)
              AND ($3::TEXT IS NULL OR e.eligibility = $3)
              AND (cardinality($4::TEXT[]) = 0 OR e.status = ANY($4))
              AND ($5::INT IS NULL OR e.organizer_id = $5)
              AND ($9::TIMESTAMPTZ IS NULL OR e.start_time >= $9)
              AND ($10::TIMESTAMPTZ IS NULL OR e.start_time <= $10)
            ORDER BY
              CASE WHEN $8::TIMESTAMPTZ IS NULL THEN 0 ELSE recent.recent_count END DESC,
              CASE WHEN $8::TIMESTAMPTZ IS NULL THEN 0 ELSE e.registration_count END DESC,
              e.start_time ASC, e.event_id ASC
            LIMIT $6 OFFSET $7
            "#
        ))
        .bind(search)
        .bind(filter.kind.map(|k| k.as_str()))
        .bind(filter.eligibility.map(|e| e.as_str()))
        .bind(statuses)
        .bind(filter.organizer_id)
        .bind(limit)
        .bind(offset)
        .bind(filter.trending_since)
        .bind(filter.starts_after)
        .bind(filter.starts_before)
        .fetch_all(&mut *conn)
        .await
        .map_err(|e| {
            error!("❌ Failed to fetch events: {:?}", e);
            RepositoryError::from(e)
        })?;

        let total = match rows.first() {
            Some(row) => row.try_get::<i64, _>("total_count")?,
            None => 0,
        };

        let mut events = rows
            .iter()
            .map(EventModel::from_row)
            .collect::<Result<Vec<_>, _>>()?;

        let ids: Vec<i32> = events.iter().map(|e| e.event_id).collect();
        let mut items = load_items(&mut *conn, &ids).await?;
        for event in &mut events {
            event.items = items.remove(&event.event_id).unwrap_or_default();
        }

        info!("✅ Found {} events (total {})", events.len(), total);
        Ok((events, total))
    }
}
