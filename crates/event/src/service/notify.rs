use crate::{
    abstract_trait::notify::{
        DynTicketNotifier, DynWebhookClient, TicketNotifierTrait, WebhookClientTrait,
    },
    model::{event::Event, registration::Registration},
};
use async_trait::async_trait;
use serde_json::{Value, json};
use shared::{
    abstract_trait::DynKafka,
    domain::{EmailRequest, TICKET_EMAIL_TOPIC},
    errors::ServiceError,
    utils::TicketEmailData,
};
use std::time::Duration;
use tokio::time::timeout;
use tracing::{error, info, warn};

const DESCRIPTION_PREVIEW_CHARS: usize = 200;

pub struct KafkaTicketNotifier {
    kafka: DynKafka,
}

impl KafkaTicketNotifier {
    pub fn new(kafka: DynKafka) -> Self {
        Self { kafka }
    }
}

#[async_trait]
impl TicketNotifierTrait for KafkaTicketNotifier {
    async fn send_ticket(&self, request: &EmailRequest) -> Result<(), ServiceError> {
        let payload = serde_json::to_vec(request)
            .map_err(|e| ServiceError::Internal(format!("Failed to serialize email: {e}")))?;

        self.kafka
            .publish(TICKET_EMAIL_TOPIC, &request.data.ticket_id, &payload)
            .await
    }
}

pub struct HttpWebhookClient {
    client: reqwest::Client,
}

impl HttpWebhookClient {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

impl Default for HttpWebhookClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl WebhookClientTrait for HttpWebhookClient {
    async fn post(&self, url: &str, payload: &Value) -> Result<(), ServiceError> {
        let response = self
            .client
            .post(url)
            .json(payload)
            .send()
            .await
            .map_err(|e| ServiceError::Internal(format!("Webhook request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(ServiceError::Internal(format!(
                "Webhook answered {}",
                response.status()
            )));
        }

        Ok(())
    }
}

/// Body posted to an organizer's webhook when an event goes live.
pub fn publish_payload(event: &Event) -> Value {
    let fee = if event.registration_fee > 0 {
        json!(event.registration_fee)
    } else {
        json!("Free")
    };
    let description: String = event
        .description
        .chars()
        .take(DESCRIPTION_PREVIEW_CHARS)
        .collect();

    json!({
        "event_id": event.event_id,
        "name": event.name,
        "kind": event.kind,
        "start_date": event.start_time.format("%Y-%m-%d").to_string(),
        "fee": fee,
        "description": description,
    })
}

pub fn ticket_email(event: &Event, registration: &Registration) -> Option<EmailRequest> {
    let ticket_id = registration.ticket_id.clone()?;
    let credential = registration.ticket_credential.clone()?;

    Some(EmailRequest {
        to: registration.participant_email.clone(),
        subject: format!("Your ticket for {}", event.name),
        data: TicketEmailData {
            event_name: event.name.clone(),
            event_kind: event.kind.to_string(),
            event_date: event.start_time.format("%Y-%m-%d %H:%M UTC").to_string(),
            participant_name: registration.participant_name.clone(),
            ticket_id,
            credential,
        },
    })
}

/// Fire-and-forget side effects. Every dispatch runs on its own task under
/// a deadline; the caller never awaits it and failures end in the log.
#[derive(Clone)]
pub struct Notifications {
    notifier: DynTicketNotifier,
    webhook: DynWebhookClient,
    deadline: Duration,
}

impl Notifications {
    pub fn new(notifier: DynTicketNotifier, webhook: DynWebhookClient, deadline: Duration) -> Self {
        Self {
            notifier,
            webhook,
            deadline,
        }
    }

    pub fn ticket_issued(&self, event: &Event, registration: &Registration) {
        let Some(request) = ticket_email(event, registration) else {
            warn!(
                "⚠️ Registration {} has no ticket, skipping email",
                registration.registration_id
            );
            return;
        };
        let notifier = self.notifier.clone();
        let deadline = self.deadline;

        tokio::spawn(async move {
            match timeout(deadline, notifier.send_ticket(&request)).await {
                Ok(Ok(())) => info!("📧 Ticket {} queued for {}", request.data.ticket_id, request.to),
                Ok(Err(e)) => error!("❌ Ticket email for {} failed: {e}", request.to),
                Err(_) => error!("❌ Ticket email for {} timed out", request.to),
            }
        });
    }

    pub fn event_published(&self, webhook_url: String, event: &Event) {
        let payload = publish_payload(event);
        let webhook = self.webhook.clone();
        let deadline = self.deadline;
        let event_id = event.event_id;

        tokio::spawn(async move {
            match timeout(deadline, webhook.post(&webhook_url, &payload)).await {
                Ok(Ok(())) => info!("📣 Publish webhook delivered for event {event_id}"),
                Ok(Err(e)) => warn!("⚠️ Publish webhook for event {event_id} failed: {e}"),
                Err(_) => warn!("⚠️ Publish webhook for event {event_id} timed out"),
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::event::{Eligibility, EventKind, EventStatus};
    use chrono::{TimeZone, Utc};

    fn event(fee: i64, description: String) -> Event {
        let start = Utc.with_ymd_and_hms(2026, 3, 14, 9, 0, 0).unwrap();
        Event {
            event_id: 4,
            organizer_id: 2,
            name: "Robotics Expo".into(),
            description,
            kind: EventKind::Normal,
            eligibility: Eligibility::All,
            registration_deadline: start,
            start_time: start,
            end_time: start,
            registration_limit: 0,
            registration_fee: fee,
            status: EventStatus::Published,
            registration_count: 0,
            total_revenue: 0,
            tags: vec![],
            form_fields: vec![],
            discussion_enabled: true,
            items: vec![],
            created_at: start,
            updated_at: start,
        }
    }

    #[test]
    fn free_events_say_free() {
        let payload = publish_payload(&event(0, "short".into()));
        assert_eq!(payload["fee"], "Free");
        assert_eq!(payload["start_date"], "2026-03-14");
        assert_eq!(payload["kind"], "normal");
    }

    #[test]
    fn long_descriptions_are_truncated() {
        let payload = publish_payload(&event(250, "x".repeat(500)));
        assert_eq!(payload["fee"], 250);
        assert_eq!(payload["description"].as_str().unwrap().len(), 200);
    }
}
