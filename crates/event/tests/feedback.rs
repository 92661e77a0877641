mod common;

use common::*;
use event::{
    abstract_trait::{
        feedback::FeedbackServiceTrait,
        registration::service::{AdmissionServiceTrait, RegistrationServiceTrait},
    },
    domain::requests::{
        feedback::{FindEventFeedback, SubmitFeedbackRequest},
        registration::RegisterRequest,
    },
};
use shared::errors::ServiceError;

fn rating(rating: i32, comment: Option<&str>) -> SubmitFeedbackRequest {
    SubmitFeedbackRequest {
        rating,
        comment: comment.map(str::to_string),
    }
}

async fn attended(h: &Harness, event_id: i32, participants: &[i32]) {
    for &id in participants {
        h.di.admission
            .register(&participant(id), event_id, &RegisterRequest::default())
            .await
            .unwrap();
    }
}

#[tokio::test]
async fn registered_participant_submits_feedback_once() {
    let h = Harness::new();
    let event = h.published(&organizer(10), normal_event(10, 0)).await;
    attended(&h, event.id, &[1]).await;

    let response = h
        .di
        .feedback
        .submit(&participant(1), event.id, &rating(4, Some("  Great talk  ")))
        .await
        .unwrap();
    assert_eq!(response.message, "Feedback submitted");
    assert_eq!(response.data.event_id, event.id);
    assert_eq!(response.data.rating, 4);
    assert_eq!(response.data.comment.as_deref(), Some("Great talk"));

    let err = h
        .di
        .feedback
        .submit(&participant(1), event.id, &rating(1, None))
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::FeedbackExists));

    let all = h
        .di
        .feedback
        .event_feedback(&organizer(10), event.id, &FindEventFeedback::default())
        .await
        .unwrap()
        .data;
    assert_eq!(all.stats.total_feedbacks, 1);
    assert_eq!(all.feedbacks[0].rating, 4);
}

#[tokio::test]
async fn unregistered_participant_cannot_leave_feedback() {
    let h = Harness::new();
    let event = h.published(&organizer(10), normal_event(10, 0)).await;

    let err = h
        .di
        .feedback
        .submit(&participant(2), event.id, &rating(5, None))
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Forbidden(_)));
}

#[tokio::test]
async fn pending_and_cancelled_registrations_do_not_qualify() {
    let h = Harness::new();
    let org = organizer(10);
    let event = h
        .published(&org, merch_event(vec![merch_item("Mug", 5000, 5, 2)]))
        .await;
    let item_id = event.items[0].item_id;

    // awaiting payment review
    h.di.admission
        .register(&participant(1), event.id, &buy(item_id, 1))
        .await
        .unwrap();
    let err = h
        .di
        .feedback
        .submit(&participant(1), event.id, &rating(3, None))
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Forbidden(_)));

    let pending = h
        .di
        .admission
        .register(&participant(2), event.id, &buy(item_id, 1))
        .await
        .unwrap()
        .data;
    h.di.registration
        .cancel(&participant(2), pending.id)
        .await
        .unwrap();
    let err = h
        .di
        .feedback
        .submit(&participant(2), event.id, &rating(3, None))
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Forbidden(_)));
}

#[tokio::test]
async fn out_of_range_rating_is_rejected() {
    let h = Harness::new();
    let event = h.published(&organizer(10), normal_event(10, 0)).await;
    attended(&h, event.id, &[1]).await;

    for bad in [0, 6] {
        let err = h
            .di
            .feedback
            .submit(&participant(1), event.id, &rating(bad, None))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)), "rating {bad}");
    }
}

#[tokio::test]
async fn organizer_sees_filtered_feedback_with_full_stats() {
    let h = Harness::new();
    let org = organizer(10);
    let event = h.published(&org, normal_event(10, 0)).await;
    attended(&h, event.id, &[1, 2, 3, 4]).await;

    for (id, stars) in [(1, 5), (2, 4), (3, 5), (4, 2)] {
        h.di.feedback
            .submit(&participant(id), event.id, &rating(stars, None))
            .await
            .unwrap();
    }

    let fives = h
        .di
        .feedback
        .event_feedback(&org, event.id, &FindEventFeedback { rating: Some(5) })
        .await
        .unwrap()
        .data;
    assert_eq!(fives.feedbacks.len(), 2);
    assert!(fives.feedbacks.iter().all(|f| f.rating == 5));
    // newest first
    assert!(fives.feedbacks[0].id > fives.feedbacks[1].id);

    let stats = fives.stats;
    assert_eq!(stats.total_feedbacks, 4);
    assert_eq!(stats.average_rating, 4.0);
    let counts: Vec<(i32, i64)> = stats
        .rating_distribution
        .iter()
        .map(|c| (c.rating, c.count))
        .collect();
    assert!(counts.contains(&(5, 2)));
    assert!(counts.contains(&(4, 1)));
    assert!(counts.contains(&(2, 1)));
    assert!(counts.contains(&(1, 0)));

    let admin_view = h
        .di
        .feedback
        .event_feedback(&admin(1), event.id, &FindEventFeedback::default())
        .await
        .unwrap()
        .data;
    assert_eq!(admin_view.feedbacks.len(), 4);
}

#[tokio::test]
async fn other_organizers_cannot_read_feedback() {
    let h = Harness::new();
    let event = h.published(&organizer(10), normal_event(10, 0)).await;

    let err = h
        .di
        .feedback
        .event_feedback(&organizer(11), event.id, &FindEventFeedback::default())
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Unauthorized(_)));
}
