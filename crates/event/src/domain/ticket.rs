use crate::model::event::EventKind;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const TICKET_PREFIX: &str = "TKT";

/// Everything a scanned credential asserts about its ticket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketPayload {
    pub ticket_id: String,
    pub event_id: i32,
    pub event_name: String,
    pub participant_id: i32,
    pub participant_name: String,
    pub kind: EventKind,
    pub issued_at: DateTime<Utc>,
}
