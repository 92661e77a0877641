mod common;

use common::*;
use event::{
    abstract_trait::{
        event::service::{EventCommandServiceTrait, EventQueryServiceTrait},
        organizer::OrganizerServiceTrait,
        registration::service::AdmissionServiceTrait,
    },
    domain::{
        patch::EventPatch,
        requests::{event::FindAllEvents, organizer::WebhookRequest, registration::RegisterRequest},
    },
    model::event::EventStatus,
};
use chrono::{Duration, Utc};
use serde_json::json;
use shared::errors::ServiceError;

#[tokio::test]
async fn organizer_drafts_then_publishes() {
    let h = Harness::new();
    let org = organizer(10);

    let draft = h
        .di
        .event_command
        .create_event(&org, &normal_event(50, 0))
        .await
        .unwrap()
        .data;
    assert_eq!(draft.status, EventStatus::Draft);
    assert_eq!(draft.registration_count, 0);

    let published = h
        .di
        .event_command
        .update_event(&org, draft.id, &status_patch(EventStatus::Published))
        .await
        .unwrap()
        .data;
    assert_eq!(published.status, EventStatus::Published);
}

#[tokio::test]
async fn participants_cannot_create_events() {
    let h = Harness::new();

    let err = h
        .di
        .event_command
        .create_event(&participant(1), &normal_event(10, 0))
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Unauthorized(_)));
}

#[tokio::test]
async fn merchandise_items_rejected_on_normal_events() {
    let h = Harness::new();
    let mut req = normal_event(10, 0);
    req.items.push(merch_item("Mug", 5000, 10, 2));

    let err = h
        .di
        .event_command
        .create_event(&organizer(10), &req)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Validation(_)));
}

#[tokio::test]
async fn published_event_rejects_frozen_fields_without_applying_any() {
    let h = Harness::new();
    let org = organizer(10);
    let event = h.published(&org, normal_event(50, 0)).await;

    let patch: EventPatch = serde_json::from_value(json!({
        "description": "A new description",
        "registration_fee": 5000,
        "name": "Renamed"
    }))
    .unwrap();

    let err = h
        .di
        .event_command
        .update_event(&org, event.id, &patch)
        .await
        .unwrap_err();
    match err {
        ServiceError::PolicyViolation { status, fields } => {
            assert_eq!(status, "published");
            assert_eq!(fields, vec!["name", "registration_fee"]);
        }
        other => panic!("expected policy violation, got {other:?}"),
    }

    let unchanged = h
        .di
        .event_query
        .find_by_id(&org, event.id)
        .await
        .unwrap()
        .data;
    assert_eq!(unchanged.description, event.description);
    assert_eq!(unchanged.name, event.name);
}

#[tokio::test]
async fn published_event_accepts_permitted_fields() {
    let h = Harness::new();
    let org = organizer(10);
    let event = h.published(&org, normal_event(50, 0)).await;

    let patch = EventPatch {
        description: Some("Moved to the main hall".into()),
        registration_limit: Some(80),
        ..EventPatch::default()
    };
    let updated = h
        .di
        .event_command
        .update_event(&org, event.id, &patch)
        .await
        .unwrap()
        .data;

    assert_eq!(updated.description, "Moved to the main hall");
    assert_eq!(updated.registration_limit, 80);
}

#[tokio::test]
async fn ongoing_event_only_accepts_status() {
    let h = Harness::new();
    let org = organizer(10);
    let event = h.published(&org, normal_event(50, 0)).await;

    h.di
        .event_command
        .update_event(&org, event.id, &status_patch(EventStatus::Ongoing))
        .await
        .unwrap();

    let patch = EventPatch {
        status: Some(EventStatus::Completed),
        description: Some("wrap-up".into()),
        ..EventPatch::default()
    };
    let err = h
        .di
        .event_command
        .update_event(&org, event.id, &patch)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::PolicyViolation { .. }));

    let completed = h
        .di
        .event_command
        .update_event(&org, event.id, &status_patch(EventStatus::Completed))
        .await
        .unwrap()
        .data;
    assert_eq!(completed.status, EventStatus::Completed);
}

#[tokio::test]
async fn transitions_outside_the_graph_are_rejected() {
    let h = Harness::new();
    let org = organizer(10);
    let draft = h
        .di
        .event_command
        .create_event(&org, &normal_event(10, 0))
        .await
        .unwrap()
        .data;

    let err = h
        .di
        .event_command
        .update_event(&org, draft.id, &status_patch(EventStatus::Ongoing))
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::InvalidTransition { .. }));

    h.di
        .event_command
        .update_event(&org, draft.id, &status_patch(EventStatus::Published))
        .await
        .unwrap();
    let err = h
        .di
        .event_command
        .update_event(&org, draft.id, &status_patch(EventStatus::Draft))
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::InvalidTransition { .. }));
}

#[tokio::test]
async fn other_organizers_cannot_edit_but_admins_can() {
    let h = Harness::new();
    let event = h.published(&organizer(10), normal_event(10, 0)).await;

    let err = h
        .di
        .event_command
        .update_event(&organizer(11), event.id, &status_patch(EventStatus::Closed))
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Unauthorized(_)));

    let closed = h
        .di
        .event_command
        .update_event(&admin(1), event.id, &status_patch(EventStatus::Closed))
        .await
        .unwrap()
        .data;
    assert_eq!(closed.status, EventStatus::Closed);
}

#[tokio::test]
async fn empty_patch_is_rejected() {
    let h = Harness::new();
    let org = organizer(10);
    let event = h.published(&org, normal_event(10, 0)).await;

    let err = h
        .di
        .event_command
        .update_event(&org, event.id, &EventPatch::default())
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Validation(_)));
}

#[tokio::test]
async fn limit_cannot_drop_below_admitted_count() {
    let h = Harness::new();
    let org = organizer(10);
    let event = h.published(&org, normal_event(10, 0)).await;

    for id in 1..=3 {
        h.di
            .admission
            .register(&participant(id), event.id, &RegisterRequest::default())
            .await
            .unwrap();
    }

    let patch = EventPatch {
        registration_limit: Some(2),
        ..EventPatch::default()
    };
    let err = h
        .di
        .event_command
        .update_event(&org, event.id, &patch)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Validation(_)));

    let unlimited = EventPatch {
        registration_limit: Some(0),
        ..EventPatch::default()
    };
    let updated = h
        .di
        .event_command
        .update_event(&org, event.id, &unlimited)
        .await
        .unwrap()
        .data;
    assert_eq!(updated.registration_limit, 0);
}

#[tokio::test]
async fn drafts_are_hidden_from_participants() {
    let h = Harness::new();
    let org = organizer(10);
    let draft = h
        .di
        .event_command
        .create_event(&org, &normal_event(10, 0))
        .await
        .unwrap()
        .data;
    h.published(&org, normal_event(10, 0)).await;

    let err = h
        .di
        .event_query
        .find_by_id(&participant(1), draft.id)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)));

    let listed = h
        .di
        .event_query
        .find_all(&participant(1), &FindAllEvents::default())
        .await
        .unwrap();
    assert_eq!(listed.data.len(), 1);
    assert!(listed.data.iter().all(|e| e.status == EventStatus::Published));

    let mine = h
        .di
        .event_query
        .find_all(
            &org,
            &FindAllEvents {
                mine: true,
                ..FindAllEvents::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(mine.data.len(), 2);
    assert_eq!(mine.pagination.total_items, 2);
}

#[tokio::test]
async fn search_matches_tags_case_insensitively() {
    let h = Harness::new();
    let org = organizer(10);
    h.published(&org, normal_event(10, 0)).await;
    h.published(&org, merch_event(vec![merch_item("Hoodie", 15000, 5, 2)]))
        .await;

    let found = h
        .di
        .event_query
        .find_all(
            &participant(1),
            &FindAllEvents {
                search: Some("MERCH".into()),
                ..FindAllEvents::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(found.data.len(), 1);
    assert_eq!(found.data[0].name, "Campus Hoodie Drop");
}

#[tokio::test]
async fn publishing_posts_to_the_organizer_webhook() {
    let h = Harness::new();
    let org = organizer(10);

    h.di
        .organizer
        .set_webhook(
            &org,
            &WebhookRequest {
                webhook_url: Some("https://hooks.campus.test/events".into()),
            },
        )
        .await
        .unwrap();

    let mut req = normal_event(10, 2500);
    req.description = "x".repeat(260);
    let event = h.published(&org, req).await;

    let calls = h.webhook_calls(1).await;
    assert_eq!(calls.len(), 1);
    let (url, payload) = &calls[0];
    assert_eq!(url, "https://hooks.campus.test/events");
    assert_eq!(payload["event_id"], json!(event.id));
    assert_eq!(payload["fee"], json!(2500));
    assert_eq!(payload["description"].as_str().unwrap().chars().count(), 200);
}

#[tokio::test]
async fn publishing_without_a_webhook_posts_nothing() {
    let h = Harness::new();
    h.published(&organizer(10), normal_event(10, 0)).await;

    let calls = h.webhook_calls(1).await;
    assert!(calls.is_empty());
}

#[tokio::test]
async fn browse_filters_by_start_date_range() {
    let h = Harness::new();
    let org = organizer(10);
    let soon = h.published(&org, normal_event(10, 0)).await;

    let mut later_req = normal_event(10, 0);
    later_req.name = "Autumn Robotics League".into();
    later_req.start_time += Duration::days(30);
    later_req.end_time += Duration::days(30);
    later_req.registration_deadline += Duration::days(30);
    let later = h.published(&org, later_req).await;

    let cutoff = Utc::now() + Duration::days(30);
    let from_cutoff = h
        .di
        .event_query
        .find_all(
            &participant(1),
            &FindAllEvents {
                start_date: Some(cutoff),
                ..FindAllEvents::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(from_cutoff.data.len(), 1);
    assert_eq!(from_cutoff.data[0].id, later.id);

    let until_cutoff = h
        .di
        .event_query
        .find_all(
            &participant(1),
            &FindAllEvents {
                end_date: Some(cutoff),
                ..FindAllEvents::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(until_cutoff.data.len(), 1);
    assert_eq!(until_cutoff.data[0].id, soon.id);

    let err = h
        .di
        .event_query
        .find_all(
            &participant(1),
            &FindAllEvents {
                start_date: Some(cutoff),
                end_date: Some(cutoff - Duration::days(1)),
                ..FindAllEvents::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Validation(_)));
}

#[tokio::test]
async fn trending_ranks_events_by_recent_registrations() {
    let h = Harness::new();
    let org = organizer(10);

    let mut events = Vec::new();
    for _ in 0..6 {
        events.push(h.published(&org, normal_event(0, 0)).await);
    }

    let mut next_participant = 1;
    for (index, registrations) in [0, 3, 1, 2, 0, 4].into_iter().enumerate() {
        for _ in 0..registrations {
            h.di
                .admission
                .register(
                    &participant(next_participant),
                    events[index].id,
                    &RegisterRequest::default(),
                )
                .await
                .unwrap();
            next_participant += 1;
        }
    }

    let trending = h
        .di
        .event_query
        .find_all(
            &participant(99),
            &FindAllEvents {
                trending: true,
                ..FindAllEvents::default()
            },
        )
        .await
        .unwrap();

    let ranked: Vec<i32> = trending.data.iter().map(|e| e.id).collect();
    assert_eq!(
        ranked,
        vec![events[5].id, events[1].id, events[3].id, events[2].id, events[0].id]
    );
    assert_eq!(trending.pagination.total_items, 5);
    assert_eq!(trending.pagination.page, 1);
}
