mod command;
mod query;

pub use self::command::EventCommandRepository;
pub use self::query::EventQueryRepository;

use crate::model::event::MerchandiseItem;
use shared::errors::RepositoryError;
use sqlx::PgConnection;
use std::collections::HashMap;
use tracing::error;

pub(crate) const EVENT_COLUMNS: &str = "event_id, organizer_id, name, description, kind, \
    eligibility, registration_deadline, start_time, end_time, registration_limit, \
    registration_fee, status, registration_count, total_revenue, tags, form_fields, \
    discussion_enabled, created_at, updated_at";

pub(crate) const ITEM_COLUMNS: &str =
    "item_id, event_id, name, price, stock, purchase_limit, variants, position";

pub(crate) async fn load_items(
    conn: &mut PgConnection,
    event_ids: &[i32],
) -> Result<HashMap<i32, Vec<MerchandiseItem>>, RepositoryError> {
    if event_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let items = sqlx::query_as::<_, MerchandiseItem>(&format!(
        "SELECT {ITEM_COLUMNS} FROM merchandise_items \
         WHERE event_id = ANY($1) ORDER BY position, item_id"
    ))
    .bind(event_ids.to_vec())
    .fetch_all(&mut *conn)
    .await
    .map_err(|e| {
        error!("❌ Failed to load merchandise items: {:?}", e);
        RepositoryError::from(e)
    })?;

    let mut grouped: HashMap<i32, Vec<MerchandiseItem>> = HashMap::new();
    for item in items {
        grouped.entry(item.event_id).or_default().push(item);
    }

    Ok(grouped)
}
