use crate::{
    domain::requests::{default_page, default_page_size},
    model::{
        event::{Eligibility, EventKind, EventStatus, VariantAxis},
        form::FormField,
    },
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

fn default_eligibility() -> Eligibility {
    Eligibility::All
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct NewMerchandiseItem {
    #[validate(length(min = 1, max = 120))]
    pub name: String,

    #[validate(range(min = 0))]
    pub price: i64,

    #[validate(range(min = 0))]
    pub stock: i32,

    #[validate(range(min = 1))]
    #[serde(default = "default_purchase_limit")]
    pub purchase_limit: i32,

    #[serde(default)]
    pub variants: Vec<VariantAxis>,
}

fn default_purchase_limit() -> i32 {
    1
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateEventRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: String,

    #[validate(length(min = 1))]
    pub description: String,

    pub kind: EventKind,

    #[serde(default = "default_eligibility")]
    pub eligibility: Eligibility,

    pub registration_deadline: DateTime<Utc>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,

    #[validate(range(min = 0))]
    #[serde(default)]
    pub registration_limit: i32,

    #[validate(range(min = 0))]
    #[serde(default)]
    pub registration_fee: i64,

    #[serde(default)]
    pub tags: Vec<String>,

    #[serde(default)]
    pub form_fields: Vec<FormField>,

    #[validate(nested)]
    #[serde(default)]
    pub items: Vec<NewMerchandiseItem>,

    #[serde(default = "default_true")]
    pub discussion_enabled: bool,
}

#[derive(Debug, Clone, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct FindAllEvents {
    /// Case-insensitive match over name, description and tags.
    pub search: Option<String>,
    pub kind: Option<EventKind>,
    pub eligibility: Option<Eligibility>,
    /// Honoured for organizers and admins only.
    pub status: Option<EventStatus>,
    pub organizer_id: Option<i32>,
    /// Organizers: list every event they own, drafts included.
    #[serde(default)]
    pub mine: bool,
    /// Earliest start time, inclusive.
    pub start_date: Option<DateTime<Utc>>,
    /// Latest start time, inclusive.
    pub end_date: Option<DateTime<Utc>>,
    /// Top events by registrations taken in the last 24 hours; ignores paging.
    #[serde(default)]
    pub trending: bool,

    #[validate(range(min = 1))]
    #[serde(default = "default_page")]
    pub page: i32,

    #[validate(range(min = 1, max = 100))]
    #[serde(default = "default_page_size")]
    pub page_size: i32,
}

impl Default for FindAllEvents {
    fn default() -> Self {
        Self {
            search: None,
            kind: None,
            eligibility: None,
            status: None,
            organizer_id: None,
            mine: false,
            start_date: None,
            end_date: None,
            trending: false,
            page: default_page(),
            page_size: default_page_size(),
        }
    }
}

/// Storage-level browse filter, resolved from the caller's role.
#[derive(Debug, Clone, Default)]
pub struct EventFilter {
    pub search: Option<String>,
    pub kind: Option<EventKind>,
    pub eligibility: Option<Eligibility>,
    pub statuses: Vec<EventStatus>,
    pub organizer_id: Option<i32>,
    pub starts_after: Option<DateTime<Utc>>,
    pub starts_before: Option<DateTime<Utc>>,
    /// When set, rank by registrations created since this instant.
    pub trending_since: Option<DateTime<Utc>>,
    pub page: i32,
    pub page_size: i32,
}

impl EventFilter {
    pub fn limit_offset(&self) -> (i64, i64) {
        let page_size = self.page_size.max(1) as i64;
        let offset = (self.page.max(1) as i64 - 1) * page_size;
        (page_size, offset)
    }
}
