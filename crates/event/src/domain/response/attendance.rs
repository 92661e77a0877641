use crate::model::registration::Registration;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AttendanceResponse {
    pub registration_id: i32,
    pub event_id: i32,
    pub ticket_id: String,
    pub participant_id: i32,
    pub participant_name: String,
    pub attended_at: DateTime<Utc>,
    pub marked_by: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AttendeeResponse {
    pub registration_id: i32,
    pub ticket_id: Option<String>,
    pub participant_name: String,
    pub participant_email: String,
    pub attended_at: Option<DateTime<Utc>>,
}

impl From<Registration> for AttendeeResponse {
    fn from(value: Registration) -> Self {
        AttendeeResponse {
            registration_id: value.registration_id,
            ticket_id: value.ticket_id,
            participant_name: value.participant_name,
            participant_email: value.participant_email,
            attended_at: value.attended_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AttendanceSummaryResponse {
    pub event_id: i32,
    pub confirmed_total: i64,
    pub attended: i64,
    pub not_attended: i64,
    pub attendees: Vec<AttendeeResponse>,
}
