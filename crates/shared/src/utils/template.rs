use askama::{Error, Template};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct TicketEmailData {
    pub event_name: String,
    pub event_kind: String,
    pub event_date: String,
    pub participant_name: String,
    pub ticket_id: String,
    pub credential: String,
}

#[derive(Template, Debug)]
#[template(path = "ticket.html")]
pub struct TicketEmailTemplate<'a> {
    pub event_name: &'a str,
    pub event_kind: &'a str,
    pub event_date: &'a str,
    pub participant_name: &'a str,
    pub ticket_id: &'a str,
    pub credential: &'a str,
}

impl<'a> From<&'a TicketEmailData> for TicketEmailTemplate<'a> {
    fn from(data: &'a TicketEmailData) -> Self {
        TicketEmailTemplate {
            event_name: &data.event_name,
            event_kind: &data.event_kind,
            event_date: &data.event_date,
            participant_name: &data.participant_name,
            ticket_id: &data.ticket_id,
            credential: &data.credential,
        }
    }
}

pub fn render_ticket_email(data: &TicketEmailData) -> Result<String, Error> {
    info!("📧 Rendering ticket email for {}", data.ticket_id);

    match TicketEmailTemplate::from(data).render() {
        Ok(result) => {
            info!("✅ Successfully rendered ticket email.");
            Ok(result)
        }
        Err(e) => {
            error!("❌ Failed to render ticket email: {}", e);
            Err(e)
        }
    }
}
