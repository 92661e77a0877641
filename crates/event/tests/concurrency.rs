mod common;

use common::*;
use event::{
    abstract_trait::{
        event::service::EventQueryServiceTrait,
        registration::service::{
            AdmissionServiceTrait, AttendanceServiceTrait, PaymentServiceTrait,
        },
    },
    domain::requests::{
        attendance::CheckInRequest, payment::ReviewPaymentRequest,
        registration::RegisterRequest,
    },
};
use shared::errors::ServiceError;
use std::sync::Arc;
use tokio::task::JoinSet;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn same_participant_racing_gets_one_registration() {
    let h = Arc::new(Harness::new());
    let event = h.published(&organizer(10), normal_event(0, 0)).await;

    let event_id = event.id;
    let mut tasks = JoinSet::new();
    for _ in 0..8 {
        let h = h.clone();
        tasks.spawn(async move {
            h.di
                .admission
                .register(&participant(1), event_id, &RegisterRequest::default())
                .await
        });
    }

    let mut admitted = 0;
    while let Some(result) = tasks.join_next().await {
        match result.unwrap() {
            Ok(_) => admitted += 1,
            Err(ServiceError::AlreadyRegistered) => {}
            Err(other) => panic!("unexpected error: {other:?}"),
        }
    }
    assert_eq!(admitted, 1);

    let refreshed = h
        .di
        .event_query
        .find_by_id(&participant(1), event.id)
        .await
        .unwrap()
        .data;
    assert_eq!(refreshed.registration_count, 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn last_seat_goes_to_exactly_one_participant() {
    let h = Arc::new(Harness::new());
    let event = h.published(&organizer(10), normal_event(1, 0)).await;

    let event_id = event.id;
    let mut tasks = JoinSet::new();
    for id in 1..=10 {
        let h = h.clone();
        tasks.spawn(async move {
            h.di
                .admission
                .register(&participant(id), event_id, &RegisterRequest::default())
                .await
        });
    }

    let mut admitted = 0;
    while let Some(result) = tasks.join_next().await {
        match result.unwrap() {
            Ok(_) => admitted += 1,
            Err(ServiceError::CapacityExceeded) => {}
            Err(other) => panic!("unexpected error: {other:?}"),
        }
    }
    assert_eq!(admitted, 1);

    let refreshed = h
        .di
        .event_query
        .find_by_id(&participant(1), event.id)
        .await
        .unwrap()
        .data;
    assert_eq!(refreshed.registration_count, 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_approvals_never_oversell() {
    let h = Arc::new(Harness::new());
    let org = organizer(10);
    let event = h
        .published(&org, merch_event(vec![merch_item("Scarf", 4000, 3, 1)]))
        .await;
    let item_id = event.items[0].item_id;

    let mut pending = Vec::new();
    for id in 1..=6 {
        pending.push(
            h.di
                .admission
                .register(&participant(id), event.id, &buy(item_id, 1))
                .await
                .unwrap()
                .data
                .id,
        );
    }

    let mut tasks = JoinSet::new();
    for registration_id in pending {
        let h = h.clone();
        let org = org.clone();
        tasks.spawn(async move {
            h.di
                .payment
                .approve(&org, registration_id, &ReviewPaymentRequest::default())
                .await
        });
    }

    let mut approved = 0;
    while let Some(result) = tasks.join_next().await {
        match result.unwrap() {
            Ok(_) => approved += 1,
            Err(ServiceError::InsufficientStock(_)) => {}
            Err(other) => panic!("unexpected error: {other:?}"),
        }
    }
    assert_eq!(approved, 3);

    let refreshed = h
        .di
        .event_query
        .find_by_id(&org, event.id)
        .await
        .unwrap()
        .data;
    assert_eq!(refreshed.items[0].stock, 0);
    assert_eq!(refreshed.total_revenue, 12000);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn double_scan_marks_attendance_once() {
    let h = Arc::new(Harness::new());
    let org = organizer(10);
    let event = h.published(&org, normal_event(0, 0)).await;
    let ticket = h
        .di
        .admission
        .register(&participant(1), event.id, &RegisterRequest::default())
        .await
        .unwrap()
        .data
        .ticket_id
        .unwrap();

    let event_id = event.id;
    let mut tasks = JoinSet::new();
    for _ in 0..5 {
        let h = h.clone();
        let org = org.clone();
        let req = CheckInRequest {
            ticket_id: Some(ticket.clone()),
            credential: None,
        };
        tasks.spawn(async move { h.di.attendance.check_in(&org, event_id, &req).await });
    }

    let mut marked = Vec::new();
    let mut repeats = Vec::new();
    while let Some(result) = tasks.join_next().await {
        match result.unwrap() {
            Ok(response) => marked.push(response.data.attended_at),
            Err(ServiceError::AlreadyMarked(at)) => repeats.push(at),
            Err(other) => panic!("unexpected error: {other:?}"),
        }
    }

    assert_eq!(marked.len(), 1);
    assert_eq!(repeats.len(), 4);
    assert!(repeats.iter().all(|at| *at == marked[0]));
}
