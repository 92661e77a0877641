mod common;

use common::*;
use event::{
    abstract_trait::{
        event::service::{EventCommandServiceTrait, EventQueryServiceTrait},
        organizer::OrganizerServiceTrait,
        registration::service::{
            AdmissionServiceTrait, PaymentServiceTrait, RegistrationServiceTrait,
        },
    },
    domain::requests::{
        organizer::WebhookRequest, payment::ReviewPaymentRequest,
        registration::RegisterRequest,
    },
    model::{
        event::EventStatus,
        registration::{PaymentStatus, RegistrationStatus},
    },
};
use std::{
    sync::{Arc, atomic::Ordering},
    time::Duration,
};
use tokio::time::timeout;

// Generous bound: the primary operation must never wait on a dispatch.
const PROMPTLY: Duration = Duration::from_secs(2);

#[tokio::test]
async fn failing_ticket_email_keeps_the_registration() {
    let notifier = Arc::new(FailingNotifier::default());
    let di = services_with(
        notifier.clone(),
        Arc::new(RecordingWebhook::default()),
        Duration::from_millis(100),
    );
    let org = organizer(10);

    let draft = di
        .event_command
        .create_event(&org, &normal_event(10, 0))
        .await
        .unwrap()
        .data;
    di.event_command
        .update_event(&org, draft.id, &status_patch(EventStatus::Published))
        .await
        .unwrap();

    let registered = di
        .admission
        .register(&participant(1), draft.id, &RegisterRequest::default())
        .await
        .unwrap()
        .data;
    assert!(registered.ticket_id.is_some());

    wait_until(|| notifier.attempts.load(Ordering::SeqCst) >= 1).await;
    assert_eq!(notifier.attempts.load(Ordering::SeqCst), 1);

    let stored = di
        .registration
        .find_by_id(&participant(1), registered.id)
        .await
        .unwrap()
        .data;
    assert_eq!(stored.status, RegistrationStatus::Registered);
    assert_eq!(stored.ticket_id, registered.ticket_id);

    let refreshed = di
        .event_query
        .find_by_id(&org, draft.id)
        .await
        .unwrap()
        .data;
    assert_eq!(refreshed.registration_count, 1);
}

#[tokio::test]
async fn failing_ticket_email_keeps_the_approval() {
    let notifier = Arc::new(FailingNotifier::default());
    let di = services_with(
        notifier.clone(),
        Arc::new(RecordingWebhook::default()),
        Duration::from_millis(100),
    );
    let org = organizer(10);

    let draft = di
        .event_command
        .create_event(&org, &merch_event(vec![merch_item("Tote", 3000, 4, 2)]))
        .await
        .unwrap()
        .data;
    let event = di
        .event_command
        .update_event(&org, draft.id, &status_patch(EventStatus::Published))
        .await
        .unwrap()
        .data;
    let item_id = event.items[0].item_id;

    let pending = di
        .admission
        .register(&participant(1), event.id, &buy(item_id, 2))
        .await
        .unwrap()
        .data;
    assert_eq!(notifier.attempts.load(Ordering::SeqCst), 0);

    let approved = di
        .payment
        .approve(&org, pending.id, &ReviewPaymentRequest::default())
        .await
        .unwrap()
        .data;
    assert_eq!(approved.payment_status, PaymentStatus::Approved);

    wait_until(|| notifier.attempts.load(Ordering::SeqCst) >= 1).await;
    assert_eq!(notifier.attempts.load(Ordering::SeqCst), 1);

    let stored = di
        .registration
        .find_by_id(&org, pending.id)
        .await
        .unwrap()
        .data;
    assert_eq!(stored.status, RegistrationStatus::Approved);
    assert!(stored.ticket_id.is_some());

    let refreshed = di
        .event_query
        .find_by_id(&org, event.id)
        .await
        .unwrap()
        .data;
    assert_eq!(refreshed.items[0].stock, 2);
    assert_eq!(refreshed.total_revenue, 6000);
}

#[tokio::test]
async fn hanging_webhook_does_not_hold_back_publishing() {
    let webhook = Arc::new(HangingWebhook::default());
    let di = services_with(
        Arc::new(RecordingNotifier::default()),
        webhook.clone(),
        Duration::from_millis(50),
    );
    let org = organizer(10);

    di.organizer
        .set_webhook(
            &org,
            &WebhookRequest {
                webhook_url: Some("https://hooks.campus.test/slow".into()),
            },
        )
        .await
        .unwrap();

    let draft = di
        .event_command
        .create_event(&org, &normal_event(10, 1500))
        .await
        .unwrap()
        .data;

    let published = timeout(
        PROMPTLY,
        di.event_command
            .update_event(&org, draft.id, &status_patch(EventStatus::Published)),
    )
    .await
    .expect("publishing waited on the webhook")
    .unwrap()
    .data;
    assert_eq!(published.status, EventStatus::Published);

    wait_until(|| webhook.attempts.load(Ordering::SeqCst) >= 1).await;
    assert_eq!(webhook.attempts.load(Ordering::SeqCst), 1);

    let stored = di
        .event_query
        .find_by_id(&participant(1), draft.id)
        .await
        .unwrap()
        .data;
    assert_eq!(stored.status, EventStatus::Published);

    // the event keeps working after the dispatch timed out
    tokio::time::sleep(Duration::from_millis(100)).await;
    di.admission
        .register(&participant(1), draft.id, &RegisterRequest::default())
        .await
        .unwrap();
}
