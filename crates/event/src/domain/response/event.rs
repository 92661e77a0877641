use crate::model::{
    event::{Eligibility, Event, EventKind, EventStatus, MerchandiseItem},
    form::FormField,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct EventResponse {
    pub id: i32,
    pub organizer_id: i32,
    pub name: String,
    pub description: String,
    pub kind: EventKind,
    pub eligibility: Eligibility,
    pub registration_deadline: DateTime<Utc>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub registration_limit: i32,
    pub registration_fee: i64,
    pub status: EventStatus,
    pub registration_count: i32,
    pub total_revenue: i64,
    pub tags: Vec<String>,
    pub form_fields: Vec<FormField>,
    pub items: Vec<MerchandiseItem>,
    pub discussion_enabled: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Event> for EventResponse {
    fn from(value: Event) -> Self {
        let mut form_fields = value.form_fields;
        form_fields.sort_by_key(|field| field.order);

        let mut items = value.items;
        items.sort_by_key(|item| item.position);

        EventResponse {
            id: value.event_id,
            organizer_id: value.organizer_id,
            name: value.name,
            description: value.description,
            kind: value.kind,
            eligibility: value.eligibility,
            registration_deadline: value.registration_deadline,
            start_time: value.start_time,
            end_time: value.end_time,
            registration_limit: value.registration_limit,
            registration_fee: value.registration_fee,
            status: value.status,
            registration_count: value.registration_count,
            total_revenue: value.total_revenue,
            tags: value.tags,
            form_fields,
            items,
            discussion_enabled: value.discussion_enabled,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}
