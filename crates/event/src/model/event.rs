use crate::model::form::FormField;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

text_enum!(EventKind, "event kind", {
    Normal => "normal",
    Merchandise => "merchandise",
});

text_enum!(Eligibility, "eligibility", {
    All => "all",
    Internal => "internal",
    External => "external",
});

text_enum!(EventStatus, "event status", {
    Draft => "draft",
    Published => "published",
    Ongoing => "ongoing",
    Completed => "completed",
    Closed => "closed",
});

impl EventStatus {
    pub fn accepts_registrations(&self) -> bool {
        matches!(self, EventStatus::Published | EventStatus::Ongoing)
    }

    /// Operator-initiated transitions; never time-driven.
    pub fn can_transition_to(&self, next: EventStatus) -> bool {
        use EventStatus::*;

        matches!(
            (self, next),
            (Draft, Published)
                | (Published, Ongoing)
                | (Published, Closed)
                | (Ongoing, Completed)
                | (Ongoing, Closed)
                | (Closed, Completed)
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct VariantAxis {
    pub name: String,
    pub options: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct MerchandiseItem {
    pub item_id: i32,
    pub event_id: i32,
    pub name: String,
    pub price: i64,
    pub stock: i32,
    pub purchase_limit: i32,
    #[sqlx(json)]
    pub variants: Vec<VariantAxis>,
    pub position: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Event {
    pub event_id: i32,
    pub organizer_id: i32,
    pub name: String,
    pub description: String,
    #[sqlx(try_from = "String")]
    pub kind: EventKind,
    #[sqlx(try_from = "String")]
    pub eligibility: Eligibility,
    pub registration_deadline: DateTime<Utc>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub registration_limit: i32,
    pub registration_fee: i64,
    #[sqlx(try_from = "String")]
    pub status: EventStatus,
    pub registration_count: i32,
    pub total_revenue: i64,
    pub tags: Vec<String>,
    #[sqlx(json)]
    pub form_fields: Vec<FormField>,
    pub discussion_enabled: bool,
    #[sqlx(skip)]
    pub items: Vec<MerchandiseItem>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Event {
    pub fn has_capacity(&self) -> bool {
        self.registration_limit == 0 || self.registration_count < self.registration_limit
    }

    pub fn item(&self, item_id: i32) -> Option<&MerchandiseItem> {
        self.items.iter().find(|item| item.item_id == item_id)
    }
}
