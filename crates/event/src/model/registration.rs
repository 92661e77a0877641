use crate::model::form::FormResponse;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::collections::BTreeMap;
use utoipa::ToSchema;

text_enum!(RegistrationStatus, "registration status", {
    Registered => "registered",
    PendingPayment => "pending_payment",
    Approved => "approved",
    Rejected => "rejected",
    Cancelled => "cancelled",
    Completed => "completed",
});

impl RegistrationStatus {
    pub const ALL: [RegistrationStatus; 6] = [
        RegistrationStatus::Registered,
        RegistrationStatus::PendingPayment,
        RegistrationStatus::Approved,
        RegistrationStatus::Rejected,
        RegistrationStatus::Cancelled,
        RegistrationStatus::Completed,
    ];

    /// Eligible for ticketing and attendance.
    pub fn is_confirmed(&self) -> bool {
        matches!(
            self,
            RegistrationStatus::Registered | RegistrationStatus::Approved
        )
    }

    pub fn is_cancellable(&self) -> bool {
        matches!(
            self,
            RegistrationStatus::Registered
                | RegistrationStatus::Approved
                | RegistrationStatus::PendingPayment
        )
    }
}

text_enum!(PaymentStatus, "payment status", {
    NotRequired => "not_required",
    Pending => "pending",
    Approved => "approved",
    Rejected => "rejected",
});

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Selection {
    pub item_id: i32,
    pub item_name: String,
    pub quantity: i32,
    #[serde(default)]
    pub variants: BTreeMap<String, String>,
    pub unit_price: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Registration {
    pub registration_id: i32,
    pub event_id: i32,
    pub participant_id: i32,
    pub participant_name: String,
    pub participant_email: String,
    #[sqlx(try_from = "String")]
    pub status: RegistrationStatus,
    #[sqlx(try_from = "String")]
    pub payment_status: PaymentStatus,
    #[sqlx(json)]
    pub form_responses: Vec<FormResponse>,
    #[sqlx(json)]
    pub selections: Vec<Selection>,
    pub payment_proof: Option<String>,
    pub reviewed_by: Option<i32>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub review_comment: Option<String>,
    pub ticket_id: Option<String>,
    pub ticket_credential: Option<String>,
    pub attended: bool,
    pub attended_at: Option<DateTime<Utc>>,
    pub attendance_marked_by: Option<i32>,
    pub total_amount: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Read-side aggregate over one event's registrations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistrationStats {
    pub total: i64,
    pub by_status: BTreeMap<String, i64>,
    pub confirmed: i64,
    pub attended: i64,
    pub pending_payments: i64,
    pub confirmed_revenue: i64,
}

impl RegistrationStats {
    /// Folds one `(status, count, attended, amount)` group into the totals.
    pub fn accumulate(
        &mut self,
        status: RegistrationStatus,
        count: i64,
        attended: i64,
        amount: i64,
    ) {
        self.total += count;
        *self.by_status.entry(status.to_string()).or_default() += count;
        self.attended += attended;

        if status.is_confirmed() {
            self.confirmed += count;
            self.confirmed_revenue += amount;
        }
        if status == RegistrationStatus::PendingPayment {
            self.pending_payments += count;
        }
    }
}

/// Total quantity per item, ordered by item id so concurrent writers lock
/// item rows in the same order.
pub fn quantities_by_item(selections: &[Selection]) -> BTreeMap<i32, i32> {
    let mut totals = BTreeMap::new();
    for selection in selections {
        let total = totals.entry(selection.item_id).or_insert(0i32);
        *total = total.saturating_add(selection.quantity);
    }
    totals
}
