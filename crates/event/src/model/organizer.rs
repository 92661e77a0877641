use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct OrganizerSettings {
    pub organizer_id: i32,
    pub webhook_url: Option<String>,
    pub updated_at: DateTime<Utc>,
}
