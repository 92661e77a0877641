use crate::{
    abstract_trait::notify::{CredentialEncoderTrait, DynCredentialEncoder},
    domain::{
        requests::registration::TicketGrant,
        ticket::{TICKET_PREFIX, TicketPayload},
    },
    model::event::Event,
};
use chrono::Utc;
use shared::{
    abstract_trait::JwtServiceTrait, config::JwtConfig, errors::ServiceError,
    utils::generate_ticket_id,
};
use tracing::warn;

/// Mints a fresh ticket identifier and its signed credential.
pub fn issue_ticket(
    encoder: &DynCredentialEncoder,
    event: &Event,
    participant_id: i32,
    participant_name: &str,
) -> Result<TicketGrant, ServiceError> {
    let ticket_id = generate_ticket_id(TICKET_PREFIX)
        .map_err(|e| ServiceError::Internal(format!("Failed to generate ticket id: {e}")))?;

    let credential = encoder.encode(&TicketPayload {
        ticket_id: ticket_id.clone(),
        event_id: event.event_id,
        event_name: event.name.clone(),
        participant_id,
        participant_name: participant_name.to_string(),
        kind: event.kind,
        issued_at: Utc::now(),
    })?;

    Ok(TicketGrant {
        ticket_id,
        credential,
    })
}

/// Signs ticket payloads into an HS256 token that a scanner hands back at
/// check-in. QR rendering of the token happens elsewhere.
#[derive(Debug, Clone)]
pub struct JwtCredentialEncoder {
    jwt: JwtConfig,
}

impl JwtCredentialEncoder {
    pub fn new(secret: &str) -> Self {
        Self {
            jwt: JwtConfig::without_expiry(secret),
        }
    }
}

impl CredentialEncoderTrait for JwtCredentialEncoder {
    fn encode(&self, payload: &TicketPayload) -> Result<String, ServiceError> {
        let claims = serde_json::to_value(payload)
            .map_err(|e| ServiceError::Internal(format!("Failed to serialize ticket: {e}")))?;
        self.jwt.sign(&claims)
    }

    fn decode(&self, credential: &str) -> Result<TicketPayload, ServiceError> {
        let claims = self.jwt.verify(credential).map_err(|e| {
            warn!("🎟️ Rejected ticket credential: {e}");
            ServiceError::InvalidTicket
        })?;
        serde_json::from_value(claims).map_err(|_| ServiceError::InvalidTicket)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::event::EventKind;

    fn payload() -> TicketPayload {
        TicketPayload {
            ticket_id: "TKT-7Q2M9X4A".into(),
            event_id: 3,
            event_name: "Hack Night".into(),
            participant_id: 11,
            participant_name: "Mina".into(),
            kind: EventKind::Normal,
            issued_at: Utc::now(),
        }
    }

    #[test]
    fn credential_carries_the_ticket() {
        let encoder = JwtCredentialEncoder::new("credential-secret");
        let ticket = payload();
        let token = encoder.encode(&ticket).unwrap();
        assert_eq!(encoder.decode(&token).unwrap(), ticket);
    }

    #[test]
    fn foreign_credentials_are_invalid_tickets() {
        let token = JwtCredentialEncoder::new("one").encode(&payload()).unwrap();
        assert!(matches!(
            JwtCredentialEncoder::new("two").decode(&token),
            Err(ServiceError::InvalidTicket)
        ));
        assert!(matches!(
            JwtCredentialEncoder::new("one").decode("garbage"),
            Err(ServiceError::InvalidTicket)
        ));
    }
}
