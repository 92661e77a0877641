use crate::{
    domain::requests::event::NewMerchandiseItem,
    model::{
        event::{Eligibility, Event, EventKind, EventStatus},
        form::FormField,
    },
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use shared::errors::ServiceError;
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum EventField {
    Name,
    Description,
    Kind,
    Eligibility,
    RegistrationDeadline,
    StartTime,
    EndTime,
    RegistrationLimit,
    RegistrationFee,
    Status,
    Tags,
    FormFields,
    Items,
    DiscussionEnabled,
}

impl EventField {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventField::Name => "name",
            EventField::Description => "description",
            EventField::Kind => "kind",
            EventField::Eligibility => "eligibility",
            EventField::RegistrationDeadline => "registration_deadline",
            EventField::StartTime => "start_time",
            EventField::EndTime => "end_time",
            EventField::RegistrationLimit => "registration_limit",
            EventField::RegistrationFee => "registration_fee",
            EventField::Status => "status",
            EventField::Tags => "tags",
            EventField::FormFields => "form_fields",
            EventField::Items => "items",
            EventField::DiscussionEnabled => "discussion_enabled",
        }
    }
}

const PUBLISHED_FIELDS: &[EventField] = &[
    EventField::Description,
    EventField::RegistrationDeadline,
    EventField::RegistrationLimit,
    EventField::Status,
];

const STATUS_ONLY: &[EventField] = &[EventField::Status];

/// Fields an update may touch while the event sits in `status`.
/// `None` means unrestricted.
pub fn allowed_fields(status: EventStatus) -> Option<&'static [EventField]> {
    match status {
        EventStatus::Draft => None,
        EventStatus::Published => Some(PUBLISHED_FIELDS),
        EventStatus::Ongoing | EventStatus::Completed | EventStatus::Closed => Some(STATUS_ONLY),
    }
}

/// Partial update of an event. Keys outside this set fail deserialization.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct EventPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub kind: Option<EventKind>,
    pub eligibility: Option<Eligibility>,
    pub registration_deadline: Option<DateTime<Utc>>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub registration_limit: Option<i32>,
    pub registration_fee: Option<i64>,
    pub status: Option<EventStatus>,
    pub tags: Option<Vec<String>>,
    pub form_fields: Option<Vec<FormField>>,
    pub items: Option<Vec<NewMerchandiseItem>>,
    pub discussion_enabled: Option<bool>,
}

impl EventPatch {
    pub fn present_fields(&self) -> Vec<EventField> {
        let mut fields = Vec::new();
        let mut mark = |present: bool, field: EventField| {
            if present {
                fields.push(field);
            }
        };

        mark(self.name.is_some(), EventField::Name);
        mark(self.description.is_some(), EventField::Description);
        mark(self.kind.is_some(), EventField::Kind);
        mark(self.eligibility.is_some(), EventField::Eligibility);
        mark(
            self.registration_deadline.is_some(),
            EventField::RegistrationDeadline,
        );
        mark(self.start_time.is_some(), EventField::StartTime);
        mark(self.end_time.is_some(), EventField::EndTime);
        mark(
            self.registration_limit.is_some(),
            EventField::RegistrationLimit,
        );
        mark(self.registration_fee.is_some(), EventField::RegistrationFee);
        mark(self.status.is_some(), EventField::Status);
        mark(self.tags.is_some(), EventField::Tags);
        mark(self.form_fields.is_some(), EventField::FormFields);
        mark(self.items.is_some(), EventField::Items);
        mark(
            self.discussion_enabled.is_some(),
            EventField::DiscussionEnabled,
        );

        fields
    }

    pub fn is_empty(&self) -> bool {
        self.present_fields().is_empty()
    }

    /// Rejects the whole patch if any present key is outside the set
    /// permitted for `status`. Nothing is applied before this passes.
    pub fn check_policy(&self, status: EventStatus) -> Result<(), ServiceError> {
        let Some(allowed) = allowed_fields(status) else {
            return Ok(());
        };

        let offending: Vec<String> = self
            .present_fields()
            .into_iter()
            .filter(|field| !allowed.contains(field))
            .map(|field| field.as_str().to_string())
            .collect();

        if offending.is_empty() {
            Ok(())
        } else {
            Err(ServiceError::PolicyViolation {
                status: status.to_string(),
                fields: offending,
            })
        }
    }

    /// The status this patch moves to, if it actually changes it.
    pub fn status_change(&self, current: EventStatus) -> Option<EventStatus> {
        self.status.filter(|next| *next != current)
    }

    /// Writes every scalar field onto `event`. Merchandise items are
    /// replaced by the repository since they need fresh ids.
    pub fn apply_to(&self, event: &mut Event) {
        if let Some(name) = &self.name {
            event.name = name.clone();
        }
        if let Some(description) = &self.description {
            event.description = description.clone();
        }
        if let Some(kind) = self.kind {
            event.kind = kind;
        }
        if let Some(eligibility) = self.eligibility {
            event.eligibility = eligibility;
        }
        if let Some(deadline) = self.registration_deadline {
            event.registration_deadline = deadline;
        }
        if let Some(start) = self.start_time {
            event.start_time = start;
        }
        if let Some(end) = self.end_time {
            event.end_time = end;
        }
        if let Some(limit) = self.registration_limit {
            event.registration_limit = limit;
        }
        if let Some(fee) = self.registration_fee {
            event.registration_fee = fee;
        }
        if let Some(status) = self.status {
            event.status = status;
        }
        if let Some(tags) = &self.tags {
            event.tags = tags.clone();
        }
        if let Some(form_fields) = &self.form_fields {
            event.form_fields = form_fields.clone();
        }
        if let Some(enabled) = self.discussion_enabled {
            event.discussion_enabled = enabled;
        }
    }
}
