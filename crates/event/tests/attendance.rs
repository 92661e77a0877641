mod common;

use common::*;
use event::{
    abstract_trait::{
        event::service::EventCommandServiceTrait,
        registration::service::{
            AdmissionServiceTrait, AnalyticsServiceTrait, AttendanceServiceTrait,
            PaymentServiceTrait, RegistrationServiceTrait,
        },
    },
    domain::requests::{
        attendance::CheckInRequest, payment::ReviewPaymentRequest,
        registration::RegisterRequest,
    },
    model::event::EventStatus,
};
use shared::errors::ServiceError;

fn by_ticket(ticket_id: &str) -> CheckInRequest {
    CheckInRequest {
        ticket_id: Some(ticket_id.to_string()),
        credential: None,
    }
}

fn by_credential(credential: &str) -> CheckInRequest {
    CheckInRequest {
        ticket_id: None,
        credential: Some(credential.to_string()),
    }
}

#[tokio::test]
async fn check_in_by_ticket_id_marks_once() {
    let h = Harness::new();
    let org = organizer(10);
    let event = h.published(&org, normal_event(10, 0)).await;
    let registration = h
        .di
        .admission
        .register(&participant(1), event.id, &RegisterRequest::default())
        .await
        .unwrap()
        .data;
    let ticket = registration.ticket_id.unwrap();

    // scanners often send lowercase or padded codes
    let scanned = format!("  {}  ", ticket.to_lowercase());
    let marked = h
        .di
        .attendance
        .check_in(&org, event.id, &by_ticket(&scanned))
        .await
        .unwrap()
        .data;
    assert_eq!(marked.ticket_id, ticket);
    assert_eq!(marked.participant_id, 1);
    assert_eq!(marked.marked_by, Some(10));

    let err = h
        .di
        .attendance
        .check_in(&org, event.id, &by_ticket(&ticket))
        .await
        .unwrap_err();
    match err {
        ServiceError::AlreadyMarked(at) => assert_eq!(at, marked.attended_at),
        other => panic!("expected already marked, got {other:?}"),
    }
}

#[tokio::test]
async fn check_in_by_credential() {
    let h = Harness::new();
    let org = organizer(10);
    let event = h.published(&org, normal_event(10, 0)).await;
    let registration = h
        .di
        .admission
        .register(&participant(1), event.id, &RegisterRequest::default())
        .await
        .unwrap()
        .data;

    let marked = h
        .di
        .attendance
        .check_in(
            &org,
            event.id,
            &by_credential(registration.ticket_credential.as_deref().unwrap()),
        )
        .await
        .unwrap()
        .data;
    assert_eq!(marked.registration_id, registration.id);
}

#[tokio::test]
async fn credential_for_another_event_is_invalid() {
    let h = Harness::new();
    let org = organizer(10);
    let first = h.published(&org, normal_event(10, 0)).await;
    let second = h.published(&org, normal_event(10, 0)).await;
    let registration = h
        .di
        .admission
        .register(&participant(1), first.id, &RegisterRequest::default())
        .await
        .unwrap()
        .data;

    let err = h
        .di
        .attendance
        .check_in(
            &org,
            second.id,
            &by_credential(registration.ticket_credential.as_deref().unwrap()),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::InvalidTicket));

    let err = h
        .di
        .attendance
        .check_in(&org, first.id, &by_credential("not-a-credential"))
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::InvalidTicket));

    let err = h
        .di
        .attendance
        .check_in(&org, first.id, &by_ticket("TKT-00000000"))
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::InvalidTicket));
}

#[tokio::test]
async fn only_managers_check_in() {
    let h = Harness::new();
    let event = h.published(&organizer(10), normal_event(10, 0)).await;
    let registration = h
        .di
        .admission
        .register(&participant(1), event.id, &RegisterRequest::default())
        .await
        .unwrap()
        .data;
    let ticket = registration.ticket_id.unwrap();

    let err = h
        .di
        .attendance
        .check_in(&organizer(11), event.id, &by_ticket(&ticket))
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Unauthorized(_)));

    let err = h
        .di
        .attendance
        .check_in(&participant(1), event.id, &by_ticket(&ticket))
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Unauthorized(_)));

    h.di
        .attendance
        .check_in(&admin(1), event.id, &by_ticket(&ticket))
        .await
        .unwrap();
}

#[tokio::test]
async fn both_references_at_once_fail_validation() {
    let h = Harness::new();
    let org = organizer(10);
    let event = h.published(&org, normal_event(10, 0)).await;

    let req = CheckInRequest {
        ticket_id: Some("TKT-AAAAAAAA".into()),
        credential: Some("abc".into()),
    };
    let err = h
        .di
        .attendance
        .check_in(&org, event.id, &req)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Validation(_)));
}

#[tokio::test]
async fn summary_and_analytics_reflect_attendance_and_revenue() {
    let h = Harness::new();
    let org = organizer(10);
    let event = h
        .published(&org, merch_event(vec![merch_item("Hoodie", 15000, 10, 2)]))
        .await;
    let item_id = event.items[0].item_id;

    let mut registrations = Vec::new();
    for id in 1..=3 {
        registrations.push(
            h.di
                .admission
                .register(&participant(id), event.id, &buy(item_id, 1))
                .await
                .unwrap()
                .data,
        );
    }
    for registration in &registrations[..2] {
        h.di
            .payment
            .approve(&org, registration.id, &ReviewPaymentRequest::default())
            .await
            .unwrap();
    }

    let approved = h
        .di
        .attendance
        .summary(&org, event.id)
        .await
        .unwrap()
        .data;
    assert_eq!(approved.confirmed_total, 2);
    assert_eq!(approved.attended, 0);

    let first = h
        .di
        .registration
        .find_by_id(&org, registrations[0].id)
        .await
        .unwrap()
        .data;
    h.di
        .attendance
        .check_in(&org, event.id, &by_ticket(first.ticket_id.as_deref().unwrap()))
        .await
        .unwrap();

    let summary = h
        .di
        .attendance
        .summary(&org, event.id)
        .await
        .unwrap()
        .data;
    assert_eq!(summary.confirmed_total, 2);
    assert_eq!(summary.attended, 1);
    assert_eq!(summary.not_attended, 1);
    assert_eq!(summary.attendees.len(), 1);
    assert_eq!(summary.attendees[0].registration_id, first.id);

    let analytics = h
        .di
        .analytics
        .event_analytics(&org, event.id)
        .await
        .unwrap()
        .data;
    assert_eq!(analytics.total_registrations, 3);
    assert_eq!(analytics.confirmed_registrations, 2);
    assert_eq!(analytics.pending_payments, 1);
    assert_eq!(analytics.attended, 1);
    assert_eq!(analytics.total_revenue, 30000);
    assert_eq!(analytics.cached_total_revenue, 30000);
    assert_eq!(analytics.by_status.get("approved"), Some(&2));
    assert_eq!(analytics.by_status.get("pending_payment"), Some(&1));

    let err = h
        .di
        .analytics
        .event_analytics(&organizer(11), event.id)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Unauthorized(_)));
}

#[tokio::test]
async fn pending_registrations_cannot_check_in() {
    let h = Harness::new();
    let org = organizer(10);
    let event = h
        .published(&org, merch_event(vec![merch_item("Hoodie", 15000, 10, 2)]))
        .await;
    h.di
        .admission
        .register(&participant(1), event.id, &buy(event.items[0].item_id, 1))
        .await
        .unwrap();

    h.di
        .event_command
        .update_event(&org, event.id, &status_patch(EventStatus::Ongoing))
        .await
        .unwrap();

    // pending registrations carry no ticket to present
    let err = h
        .di
        .attendance
        .check_in(&org, event.id, &by_ticket("TKT-PENDING1"))
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::InvalidTicket));
}
