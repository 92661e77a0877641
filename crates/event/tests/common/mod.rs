#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{Duration as ChronoDuration, Utc};
use event::{
    abstract_trait::{
        event::service::EventCommandServiceTrait,
        notify::{DynTicketNotifier, DynWebhookClient, TicketNotifierTrait, WebhookClientTrait},
    },
    di::{Collaborators, DependenciesInject, Repositories},
    domain::{
        identity::{Actor, ParticipantClass, Role},
        patch::EventPatch,
        requests::{
            event::{CreateEventRequest, NewMerchandiseItem},
            registration::{RegisterRequest, SelectionRequest},
        },
        response::event::EventResponse,
    },
    model::event::{EventKind, EventStatus, VariantAxis},
    repository::memory::MemoryStore,
    service::credential::JwtCredentialEncoder,
};
use prometheus_client::registry::Registry;
use serde_json::Value;
use shared::{domain::EmailRequest, errors::ServiceError};
use std::{
    collections::BTreeMap,
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

pub const CREDENTIAL_SECRET: &str = "test-credential-secret";

#[derive(Default)]
pub struct RecordingNotifier {
    pub sent: Mutex<Vec<EmailRequest>>,
}

#[async_trait]
impl TicketNotifierTrait for RecordingNotifier {
    async fn send_ticket(&self, request: &EmailRequest) -> Result<(), ServiceError> {
        self.sent.lock().unwrap().push(request.clone());
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingWebhook {
    pub calls: Mutex<Vec<(String, Value)>>,
}

#[async_trait]
impl WebhookClientTrait for RecordingWebhook {
    async fn post(&self, url: &str, payload: &Value) -> Result<(), ServiceError> {
        self.calls
            .lock()
            .unwrap()
            .push((url.to_string(), payload.clone()));
        Ok(())
    }
}

/// Counts attempts and fails every one of them.
#[derive(Default)]
pub struct FailingNotifier {
    pub attempts: AtomicUsize,
}

#[async_trait]
impl TicketNotifierTrait for FailingNotifier {
    async fn send_ticket(&self, _request: &EmailRequest) -> Result<(), ServiceError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Err(ServiceError::Kafka("broker unavailable".into()))
    }
}

/// Counts attempts and never answers.
#[derive(Default)]
pub struct HangingWebhook {
    pub attempts: AtomicUsize,
}

#[async_trait]
impl WebhookClientTrait for HangingWebhook {
    async fn post(&self, _url: &str, _payload: &Value) -> Result<(), ServiceError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        std::future::pending::<()>().await;
        Ok(())
    }
}

pub struct Harness {
    pub store: MemoryStore,
    pub di: DependenciesInject,
    pub notifier: Arc<RecordingNotifier>,
    pub webhook: Arc<RecordingWebhook>,
}

impl Harness {
    pub fn new() -> Self {
        let store = MemoryStore::new();
        let (collaborators, notifier, webhook) = collaborators();
        let mut registry = Registry::default();
        let di = DependenciesInject::new(
            Repositories::memory(store.clone()),
            collaborators,
            &mut registry,
        );

        Self {
            store,
            di,
            notifier,
            webhook,
        }
    }

    /// Creates a draft as `organizer` and publishes it.
    pub async fn published(&self, organizer: &Actor, req: CreateEventRequest) -> EventResponse {
        let draft = self
            .di
            .event_command
            .create_event(organizer, &req)
            .await
            .unwrap()
            .data;

        self.di
            .event_command
            .update_event(organizer, draft.id, &status_patch(EventStatus::Published))
            .await
            .unwrap()
            .data
    }

    pub async fn emails_sent(&self, expected: usize) -> Vec<EmailRequest> {
        wait_until(|| self.notifier.sent.lock().unwrap().len() >= expected).await;
        self.notifier.sent.lock().unwrap().clone()
    }

    pub async fn webhook_calls(&self, expected: usize) -> Vec<(String, Value)> {
        wait_until(|| self.webhook.calls.lock().unwrap().len() >= expected).await;
        self.webhook.calls.lock().unwrap().clone()
    }
}

/// Services wired to the given notification doubles.
pub fn services_with(
    notifier: DynTicketNotifier,
    webhook: DynWebhookClient,
    notify_timeout: Duration,
) -> DependenciesInject {
    let collaborators = Collaborators {
        notifier,
        webhook,
        encoder: Arc::new(JwtCredentialEncoder::new(CREDENTIAL_SECRET)),
        notify_timeout,
    };
    let mut registry = Registry::default();
    DependenciesInject::new(
        Repositories::memory(MemoryStore::new()),
        collaborators,
        &mut registry,
    )
}

pub fn collaborators() -> (Collaborators, Arc<RecordingNotifier>, Arc<RecordingWebhook>) {
    let notifier = Arc::new(RecordingNotifier::default());
    let webhook = Arc::new(RecordingWebhook::default());

    let collaborators = Collaborators {
        notifier: notifier.clone(),
        webhook: webhook.clone(),
        encoder: Arc::new(JwtCredentialEncoder::new(CREDENTIAL_SECRET)),
        notify_timeout: Duration::from_secs(1),
    };

    (collaborators, notifier, webhook)
}

/// Background notifications land on spawned tasks; give them a moment.
pub async fn wait_until(mut done: impl FnMut() -> bool) {
    for _ in 0..100 {
        if done() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}

fn actor(user_id: i32, role: Role, class: Option<ParticipantClass>) -> Actor {
    Actor {
        user_id,
        role,
        name: format!("User {user_id}"),
        email: format!("user{user_id}@campus.test"),
        participant_class: class,
    }
}

pub fn organizer(user_id: i32) -> Actor {
    actor(user_id, Role::Organizer, None)
}

pub fn admin(user_id: i32) -> Actor {
    actor(user_id, Role::Admin, None)
}

pub fn participant(user_id: i32) -> Actor {
    actor(user_id, Role::Participant, Some(ParticipantClass::Internal))
}

pub fn external_participant(user_id: i32) -> Actor {
    actor(user_id, Role::Participant, Some(ParticipantClass::External))
}

pub fn normal_event(limit: i32, fee: i64) -> CreateEventRequest {
    let start = Utc::now() + ChronoDuration::days(14);

    CreateEventRequest {
        name: "Robotics Workshop".into(),
        description: "Hands-on robotics session for beginners".into(),
        kind: EventKind::Normal,
        eligibility: event::model::event::Eligibility::All,
        registration_deadline: start - ChronoDuration::days(1),
        start_time: start,
        end_time: start + ChronoDuration::hours(3),
        registration_limit: limit,
        registration_fee: fee,
        tags: vec!["robotics".into(), "workshop".into()],
        form_fields: Vec::new(),
        items: Vec::new(),
        discussion_enabled: true,
    }
}

pub fn merch_item(name: &str, price: i64, stock: i32, purchase_limit: i32) -> NewMerchandiseItem {
    NewMerchandiseItem {
        name: name.into(),
        price,
        stock,
        purchase_limit,
        variants: Vec::new(),
    }
}

pub fn sized(mut item: NewMerchandiseItem, sizes: &[&str]) -> NewMerchandiseItem {
    item.variants.push(VariantAxis {
        name: "size".into(),
        options: sizes.iter().map(|s| s.to_string()).collect(),
    });
    item
}

pub fn merch_event(items: Vec<NewMerchandiseItem>) -> CreateEventRequest {
    CreateEventRequest {
        name: "Campus Hoodie Drop".into(),
        description: "Limited run of faculty merchandise".into(),
        kind: EventKind::Merchandise,
        tags: vec!["merch".into()],
        items,
        ..normal_event(0, 0)
    }
}

pub fn status_patch(status: EventStatus) -> EventPatch {
    EventPatch {
        status: Some(status),
        ..EventPatch::default()
    }
}

pub fn buy(item_id: i32, quantity: i32) -> RegisterRequest {
    RegisterRequest {
        selections: vec![SelectionRequest {
            item_id,
            quantity,
            variants: BTreeMap::new(),
        }],
        payment_proof: Some("uploads/proof.png".into()),
        ..RegisterRequest::default()
    }
}

pub fn buy_sized(item_id: i32, quantity: i32, size: &str) -> RegisterRequest {
    let mut req = buy(item_id, quantity);
    req.selections[0]
        .variants
        .insert("size".into(), size.into());
    req
}
