use crate::{
    abstract_trait::registration::repository::RegistrationCommandRepositoryTrait,
    domain::requests::registration::{NewRegistration, PaymentReview, TicketGrant},
    model::{
        event::EventStatus,
        registration::{
            PaymentStatus, Registration as RegistrationModel, RegistrationStatus,
            quantities_by_item,
        },
    },
    repository::registration::REGISTRATION_COLUMNS,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use shared::{config::ConnectionPool, errors::RepositoryError};
use sqlx::{PgConnection, types::Json};
use tracing::{error, info, warn};

pub struct RegistrationCommandRepository {
    db: ConnectionPool,
}

impl RegistrationCommandRepository {
    pub fn new(db: ConnectionPool) -> Self {
        Self { db }
    }
}

async fn lock_registration(
    conn: &mut PgConnection,
    registration_id: i32,
) -> Result<RegistrationModel, RepositoryError> {
    sqlx::query_as::<_, RegistrationModel>(&format!(
        "SELECT {REGISTRATION_COLUMNS} FROM registrations WHERE registration_id = $1 FOR UPDATE"
    ))
    .bind(registration_id)
    .fetch_optional(&mut *conn)
    .await
    .map_err(RepositoryError::from)?
    .ok_or(RepositoryError::NotFound)
}

/// Conditional decrement: succeeds only while enough stock remains.
async fn take_stock(
    conn: &mut PgConnection,
    event_id: i32,
    item_id: i32,
    quantity: i32,
) -> Result<(), RepositoryError> {
    let taken: Option<i32> = sqlx::query_scalar(
        r#"
        UPDATE merchandise_items
        SET stock = stock - $3
        WHERE item_id = $1 AND event_id = $2 AND stock >= $3
        RETURNING item_id
        "#,
    )
    .bind(item_id)
    .bind(event_id)
    .bind(quantity)
    .fetch_optional(&mut *conn)
    .await
    .map_err(RepositoryError::from)?;

    match taken {
        Some(_) => Ok(()),
        None => {
            warn!("📦 Item {} cannot cover quantity {}", item_id, quantity);
            Err(RepositoryError::InsufficientStock(item_id))
        }
    }
}

async fn return_stock(
    conn: &mut PgConnection,
    event_id: i32,
    item_id: i32,
    quantity: i32,
) -> Result<(), RepositoryError> {
    sqlx::query("UPDATE merchandise_items SET stock = stock + $3 WHERE item_id = $1 AND event_id = $2")
        .bind(item_id)
        .bind(event_id)
        .bind(quantity)
        .execute(&mut *conn)
        .await
        .map_err(RepositoryError::from)?;
    Ok(())
}

/// Moves the cached counters on the event row. Runs before any item row is
/// touched so every writer locks event → items in the same order.
async fn adjust_event_counters(
    conn: &mut PgConnection,
    event_id: i32,
    seats: i32,
    revenue: i64,
) -> Result<(), RepositoryError> {
    sqlx::query(
        r#"
        UPDATE events
        SET registration_count = GREATEST(registration_count + $2, 0),
            total_revenue      = total_revenue + $3,
            updated_at         = CURRENT_TIMESTAMP
        WHERE event_id = $1
        "#,
    )
    .bind(event_id)
    .bind(seats)
    .bind(revenue)
    .execute(&mut *conn)
    .await
    .map_err(RepositoryError::from)?;
    Ok(())
}

#[async_trait]
impl RegistrationCommandRepositoryTrait for RegistrationCommandRepository {
    async fn admit(&self, record: &NewRegistration) -> Result<RegistrationModel, RepositoryError> {
        let mut tx = self.db.begin().await.map_err(RepositoryError::from)?;

        // The unique (participant, event) constraint makes a racing duplicate
        // wait here and then fail, before it can take a seat.
        let registration = sqlx::query_as::<_, RegistrationModel>(&format!(
            r#"
            INSERT INTO registrations (
                event_id, participant_id, participant_name, participant_email,
                status, payment_status, form_responses, selections, payment_proof,
                total_amount, ticket_id, ticket_credential
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING {REGISTRATION_COLUMNS}
            "#
        ))
        .bind(record.event_id)
        .bind(record.participant_id)
        .bind(&record.participant_name)
        .bind(&record.participant_email)
        .bind(record.status.as_str())
        .bind(record.payment_status.as_str())
        .bind(Json(&record.form_responses))
        .bind(Json(&record.selections))
        .bind(record.payment_proof.as_deref())
        .bind(record.total_amount)
        .bind(record.ticket.as_ref().map(|t| t.ticket_id.as_str()))
        .bind(record.ticket.as_ref().map(|t| t.credential.as_str()))
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            error!(
                "❌ Failed to insert registration of participant {} for event {}: {:?}",
                record.participant_id, record.event_id, e
            );
            RepositoryError::from(e)
        })?;

        let confirmed = record.status.is_confirmed();
        let revenue = if confirmed { record.total_amount } else { 0 };

        let seat: Option<i32> = sqlx::query_scalar(
            r#"
            UPDATE events
            SET registration_count = registration_count + 1,
                total_revenue      = total_revenue + $2,
                updated_at         = CURRENT_TIMESTAMP
            WHERE event_id = $1
              AND status IN ('published', 'ongoing')
              AND (registration_limit = 0 OR registration_count < registration_limit)
            RETURNING event_id
            "#,
        )
        .bind(record.event_id)
        .bind(revenue)
        .fetch_optional(&mut *tx)
        .await
        .map_err(RepositoryError::from)?;

        if seat.is_none() {
            let status: Option<String> =
                sqlx::query_scalar("SELECT status FROM events WHERE event_id = $1")
                    .bind(record.event_id)
                    .fetch_optional(&mut *tx)
                    .await
                    .map_err(RepositoryError::from)?;

            return Err(match status {
                None => RepositoryError::NotFound,
                Some(status)
                    if EventStatus::try_from(status.clone())
                        .map(|s| s.accepts_registrations())
                        .unwrap_or(false) =>
                {
                    RepositoryError::CapacityExceeded
                }
                Some(_) => RepositoryError::EventNotOpen,
            });
        }

        if confirmed {
            for (item_id, quantity) in quantities_by_item(&record.selections) {
                take_stock(&mut *tx, record.event_id, item_id, quantity).await?;
            }
        }

        tx.commit().await.map_err(RepositoryError::from)?;

        info!(
            "🎟️ Admitted participant {} to event {} as '{}'",
            record.participant_id, record.event_id, registration.status
        );
        Ok(registration)
    }

    async fn approve_payment(
        &self,
        review: &PaymentReview,
        ticket: &TicketGrant,
    ) -> Result<RegistrationModel, RepositoryError> {
        let mut tx = self.db.begin().await.map_err(RepositoryError::from)?;

        let current = lock_registration(&mut *tx, review.registration_id).await?;
        if current.status != RegistrationStatus::PendingPayment
            || current.payment_status != PaymentStatus::Pending
        {
            return Err(RepositoryError::AlreadyReviewed);
        }

        adjust_event_counters(&mut *tx, current.event_id, 0, current.total_amount).await?;

        for (item_id, quantity) in quantities_by_item(&current.selections) {
            take_stock(&mut *tx, current.event_id, item_id, quantity).await?;
        }

        let approved = sqlx::query_as::<_, RegistrationModel>(&format!(
            r#"
            UPDATE registrations
            SET status            = 'approved',
                payment_status    = 'approved',
                reviewed_by       = $2,
                reviewed_at       = $3,
                review_comment    = $4,
                ticket_id         = $5,
                ticket_credential = $6,
                updated_at        = CURRENT_TIMESTAMP
            WHERE registration_id = $1 AND ticket_id IS NULL
            RETURNING {REGISTRATION_COLUMNS}
            "#
        ))
        .bind(review.registration_id)
        .bind(review.reviewer_id)
        .bind(review.reviewed_at)
        .bind(review.comment.as_deref())
        .bind(&ticket.ticket_id)
        .bind(&ticket.credential)
        .fetch_optional(&mut *tx)
        .await
        .map_err(RepositoryError::from)?
        .ok_or_else(|| RepositoryError::Conflict("Ticket already issued".into()))?;

        tx.commit().await.map_err(RepositoryError::from)?;

        info!(
            "✅ Payment approved for registration {} by {}",
            review.registration_id, review.reviewer_id
        );
        Ok(approved)
    }

    async fn reject_payment(
        &self,
        review: &PaymentReview,
    ) -> Result<RegistrationModel, RepositoryError> {
        let mut tx = self.db.begin().await.map_err(RepositoryError::from)?;

        let current = lock_registration(&mut *tx, review.registration_id).await?;
        if current.status != RegistrationStatus::PendingPayment
            || current.payment_status != PaymentStatus::Pending
        {
            return Err(RepositoryError::AlreadyReviewed);
        }

        adjust_event_counters(&mut *tx, current.event_id, -1, 0).await?;

        let rejected = sqlx::query_as::<_, RegistrationModel>(&format!(
            r#"
            UPDATE registrations
            SET status         = 'rejected',
                payment_status = 'rejected',
                reviewed_by    = $2,
                reviewed_at    = $3,
                review_comment = $4,
                updated_at     = CURRENT_TIMESTAMP
            WHERE registration_id = $1
            RETURNING {REGISTRATION_COLUMNS}
            "#
        ))
        .bind(review.registration_id)
        .bind(review.reviewer_id)
        .bind(review.reviewed_at)
        .bind(review.comment.as_deref())
        .fetch_one(&mut *tx)
        .await
        .map_err(RepositoryError::from)?;

        tx.commit().await.map_err(RepositoryError::from)?;

        info!(
            "🚫 Payment rejected for registration {} by {}",
            review.registration_id, review.reviewer_id
        );
        Ok(rejected)
    }

    async fn attach_payment_proof(
        &self,
        registration_id: i32,
        payment_proof: &str,
    ) -> Result<RegistrationModel, RepositoryError> {
        let updated = sqlx::query_as::<_, RegistrationModel>(&format!(
            r#"
            UPDATE registrations
            SET payment_proof = $2,
                updated_at    = CURRENT_TIMESTAMP
            WHERE registration_id = $1 AND payment_status = 'pending'
            RETURNING {REGISTRATION_COLUMNS}
            "#
        ))
        .bind(registration_id)
        .bind(payment_proof)
        .fetch_optional(&self.db)
        .await
        .map_err(RepositoryError::from)?;

        if let Some(registration) = updated {
            info!("🧾 Payment proof attached to registration {}", registration_id);
            return Ok(registration);
        }

        let exists: Option<i32> =
            sqlx::query_scalar("SELECT registration_id FROM registrations WHERE registration_id = $1")
                .bind(registration_id)
                .fetch_optional(&self.db)
                .await
                .map_err(RepositoryError::from)?;

        Err(match exists {
            Some(_) => RepositoryError::AlreadyReviewed,
            None => RepositoryError::NotFound,
        })
    }

    async fn mark_attended(
        &self,
        registration_id: i32,
        marked_by: i32,
        at: DateTime<Utc>,
    ) -> Result<RegistrationModel, RepositoryError> {
        let marked = sqlx::query_as::<_, RegistrationModel>(&format!(
            r#"
            UPDATE registrations
            SET attended             = TRUE,
                attended_at          = $2,
                attendance_marked_by = $3,
                updated_at           = CURRENT_TIMESTAMP
            WHERE registration_id = $1
              AND attended = FALSE
              AND status IN ('registered', 'approved')
            RETURNING {REGISTRATION_COLUMNS}
            "#
        ))
        .bind(registration_id)
        .bind(at)
        .bind(marked_by)
        .fetch_optional(&self.db)
        .await
        .map_err(RepositoryError::from)?;

        if let Some(registration) = marked {
            info!("✅ Attendance marked for registration {}", registration_id);
            return Ok(registration);
        }

        let current: Option<(bool, Option<DateTime<Utc>>)> = sqlx::query_as(
            "SELECT attended, attended_at FROM registrations WHERE registration_id = $1",
        )
        .bind(registration_id)
        .fetch_optional(&self.db)
        .await
        .map_err(RepositoryError::from)?;

        Err(match current {
            None => RepositoryError::NotFound,
            Some((true, attended_at)) => RepositoryError::AlreadyMarked(attended_at.unwrap_or(at)),
            Some((false, _)) => RepositoryError::NotConfirmed,
        })
    }

    async fn cancel(&self, registration_id: i32) -> Result<RegistrationModel, RepositoryError> {
        let mut tx = self.db.begin().await.map_err(RepositoryError::from)?;

        let current = lock_registration(&mut *tx, registration_id).await?;

        if current.attended {
            return Err(RepositoryError::AlreadyMarked(
                current.attended_at.unwrap_or(current.updated_at),
            ));
        }
        if !current.status.is_cancellable() {
            return Err(RepositoryError::Conflict(format!(
                "Registration is already {}",
                current.status
            )));
        }

        let confirmed = current.status.is_confirmed();
        let revenue = if confirmed { -current.total_amount } else { 0 };

        adjust_event_counters(&mut *tx, current.event_id, -1, revenue).await?;

        if confirmed {
            for (item_id, quantity) in quantities_by_item(&current.selections) {
                return_stock(&mut *tx, current.event_id, item_id, quantity).await?;
            }
        }

        let cancelled = sqlx::query_as::<_, RegistrationModel>(&format!(
            r#"
            UPDATE registrations
            SET status     = 'cancelled',
                updated_at = CURRENT_TIMESTAMP
            WHERE registration_id = $1
            RETURNING {REGISTRATION_COLUMNS}
            "#
        ))
        .bind(registration_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(RepositoryError::from)?;

        tx.commit().await.map_err(RepositoryError::from)?;

        info!(
            "🗑️ Registration {} cancelled (restocked: {})",
            registration_id, confirmed
        );
        Ok(cancelled)
    }
}
