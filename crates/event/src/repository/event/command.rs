use crate::{
    abstract_trait::event::repository::EventCommandRepositoryTrait,
    domain::{
        patch::EventPatch,
        requests::event::{CreateEventRequest, NewMerchandiseItem},
    },
    model::event::{Event as EventModel, EventStatus, MerchandiseItem},
    repository::event::{EVENT_COLUMNS, ITEM_COLUMNS, load_items},
};
use async_trait::async_trait;
use shared::{config::ConnectionPool, errors::RepositoryError};
use sqlx::{PgConnection, types::Json};
use tracing::{error, info};

pub struct EventCommandRepository {
    db: ConnectionPool,
}

impl EventCommandRepository {
    pub fn new(db: ConnectionPool) -> Self {
        Self { db }
    }
}

async fn insert_items(
    conn: &mut PgConnection,
    event_id: i32,
    items: &[NewMerchandiseItem],
) -> Result<Vec<MerchandiseItem>, RepositoryError> {
    let mut inserted = Vec::with_capacity(items.len());

    for (position, item) in items.iter().enumerate() {
        let row = sqlx::query_as::<_, MerchandiseItem>(&format!(
            r#"
            INSERT INTO merchandise_items (event_id, name, price, stock, purchase_limit, variants, position)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {ITEM_COLUMNS}
            "#
        ))
        .bind(event_id)
        .bind(&item.name)
        .bind(item.price)
        .bind(item.stock)
        .bind(item.purchase_limit)
        .bind(Json(&item.variants))
        .bind(position as i32)
        .fetch_one(&mut *conn)
        .await
        .map_err(|e| {
            error!("❌ Failed to insert item '{}': {:?}", item.name, e);
            RepositoryError::from(e)
        })?;

        inserted.push(row);
    }

    Ok(inserted)
}

#[async_trait]
impl EventCommandRepositoryTrait for EventCommandRepository {
    async fn create_event(
        &self,
        organizer_id: i32,
        req: &CreateEventRequest,
    ) -> Result<EventModel, RepositoryError> {
        let mut tx = self.db.begin().await.map_err(RepositoryError::from)?;

        let mut event = sqlx::query_as::<_, EventModel>(&format!(
            r#"
            INSERT INTO events (
                organizer_id, name, description, kind, eligibility,
                registration_deadline, start_time, end_time,
                registration_limit, registration_fee, status,
                tags, form_fields, discussion_enabled
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, 'draft', $11, $12, $13)
            RETURNING {EVENT_COLUMNS}
            "#
        ))
        .bind(organizer_id)
        .bind(&req.name)
        .bind(&req.description)
        .bind(req.kind.as_str())
        .bind(req.eligibility.as_str())
        .bind(req.registration_deadline)
        .bind(req.start_time)
        .bind(req.end_time)
        .bind(req.registration_limit)
        .bind(req.registration_fee)
        .bind(&req.tags)
        .bind(Json(&req.form_fields))
        .bind(req.discussion_enabled)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            error!("❌ Failed to create event '{}': {:?}", req.name, e);
            RepositoryError::from(e)
        })?;

        event.items = insert_items(&mut *tx, event.event_id, &req.items).await?;

        tx.commit().await.map_err(RepositoryError::from)?;

        info!(
            "✅ Created event ID {} for organizer {}",
            event.event_id, organizer_id
        );
        Ok(event)
    }

    async fn update_event(
        &self,
        event_id: i32,
        expected_status: EventStatus,
        patch: &EventPatch,
    ) -> Result<EventModel, RepositoryError> {
        let mut tx = self.db.begin().await.map_err(RepositoryError::from)?;

        let current: Option<(String, i32)> = sqlx::query_as(
            "SELECT status, registration_count FROM events WHERE event_id = $1 FOR UPDATE",
        )
        .bind(event_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(RepositoryError::from)?;

        let Some((status, registration_count)) = current else {
            return Err(RepositoryError::NotFound);
        };

        if status != expected_status.as_str() {
            error!(
                "❌ Event {} moved from '{}' to '{}' during update",
                event_id, expected_status, status
            );
            return Err(RepositoryError::Conflict(
                "Event status changed concurrently".into(),
            ));
        }

        if let Some(limit) = patch.registration_limit {
            if limit != 0 && limit < registration_count {
                return Err(RepositoryError::Conflict(format!(
                    "registration_limit {limit} is below the {registration_count} admitted participants"
                )));
            }
        }

        let mut event = sqlx::query_as::<_, EventModel>(&format!(
            r#"
            UPDATE events
            SET name                  = COALESCE($2, name),
                description           = COALESCE($3, description),
                kind                  = COALESCE($4, kind),
                eligibility           = COALESCE($5, eligibility),
                registration_deadline = COALESCE($6, registration_deadline),
                start_time            = COALESCE($7, start_time),
                end_time              = COALESCE($8, end_time),
                registration_limit    = COALESCE($9, registration_limit),
                registration_fee      = COALESCE($10, registration_fee),
                status                = COALESCE($11, status),
                tags                  = COALESCE($12, tags),
                form_fields           = COALESCE($13, form_fields),
                discussion_enabled    = COALESCE($14, discussion_enabled),
                updated_at            = CURRENT_TIMESTAMP
            WHERE event_id = $1
            RETURNING {EVENT_COLUMNS}
            "#
        ))
        .bind(event_id)
        .bind(patch.name.as_deref())
        .bind(patch.description.as_deref())
        .bind(patch.kind.map(|k| k.as_str()))
        .bind(patch.eligibility.map(|e| e.as_str()))
        .bind(patch.registration_deadline)
        .bind(patch.start_time)
        .bind(patch.end_time)
        .bind(patch.registration_limit)
        .bind(patch.registration_fee)
        .bind(patch.status.map(|s| s.as_str()))
        .bind(patch.tags.as_ref())
        .bind(patch.form_fields.as_ref().map(Json))
        .bind(patch.discussion_enabled)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            error!("❌ Failed to update event {}: {:?}", event_id, e);
            RepositoryError::from(e)
        })?;

        event.items = match &patch.items {
            Some(items) => {
                sqlx::query("DELETE FROM merchandise_items WHERE event_id = $1")
                    .bind(event_id)
                    .execute(&mut *tx)
                    .await
                    .map_err(RepositoryError::from)?;
                insert_items(&mut *tx, event_id, items).await?
            }
            None => load_items(&mut *tx, &[event_id])
                .await?
                .remove(&event_id)
                .unwrap_or_default(),
        };

        tx.commit().await.map_err(RepositoryError::from)?;

        info!("🔄 Updated event ID {} (now '{}')", event_id, event.status);
        Ok(event)
    }
}
