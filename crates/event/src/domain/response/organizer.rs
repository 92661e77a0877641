use crate::model::organizer::OrganizerSettings;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct OrganizerSettingsResponse {
    pub organizer_id: i32,
    pub webhook_url: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl From<OrganizerSettings> for OrganizerSettingsResponse {
    fn from(value: OrganizerSettings) -> Self {
        OrganizerSettingsResponse {
            organizer_id: value.organizer_id,
            webhook_url: value.webhook_url,
            updated_at: value.updated_at,
        }
    }
}
