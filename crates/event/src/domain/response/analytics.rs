use crate::model::event::EventStatus;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct EventAnalyticsResponse {
    pub event_id: i32,
    pub status: EventStatus,
    pub total_registrations: i64,
    pub by_status: BTreeMap<String, i64>,
    pub confirmed_registrations: i64,
    pub attended: i64,
    pub pending_payments: i64,
    /// Sum of `total_amount` over confirmed registrations.
    pub total_revenue: i64,
    pub registration_limit: i32,
    pub cached_registration_count: i32,
    pub cached_total_revenue: i64,
}
