use crate::utils::TicketEmailData;
use serde::{Deserialize, Serialize};

pub const TICKET_EMAIL_TOPIC: &str = "email-service-topic-event-ticket";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailRequest {
    pub to: String,
    pub subject: String,
    pub data: TicketEmailData,
}
