use crate::{
    abstract_trait::event::{repository::DynEventQueryRepository, service::EventQueryServiceTrait},
    domain::{
        identity::{Actor, Role},
        requests::event::{EventFilter, FindAllEvents},
        response::{
            api::{ApiResponse, ApiResponsePagination},
            event::EventResponse,
            pagination::Pagination,
        },
    },
    model::event::EventStatus,
    service::{load_event, validation::invalid},
};
use async_trait::async_trait;
use chrono::{Duration, Utc};
use opentelemetry::KeyValue;
use shared::{errors::ServiceError, utils::OperationTracer};
use tracing::info;
use validator::Validate;

const BROWSABLE: [EventStatus; 2] = [EventStatus::Published, EventStatus::Ongoing];
const TRENDING_LIMIT: i32 = 5;
const TRENDING_WINDOW_HOURS: i64 = 24;

#[derive(Clone)]
pub struct EventQueryService {
    query: DynEventQueryRepository,
    tracer: OperationTracer,
}

impl EventQueryService {
    pub fn new(query: DynEventQueryRepository, tracer: OperationTracer) -> Self {
        Self { query, tracer }
    }
}

/// Narrows a browse request to what the caller is allowed to see.
pub fn browse_filter(actor: &Actor, req: &FindAllEvents) -> EventFilter {
    let (statuses, organizer_id) = match actor.role {
        Role::Admin => (req.status.into_iter().collect(), req.organizer_id),
        Role::Organizer if req.mine => (req.status.into_iter().collect(), Some(actor.user_id)),
        Role::Organizer => match req.status {
            Some(status) if status != EventStatus::Draft => (vec![status], req.organizer_id),
            _ => (BROWSABLE.to_vec(), req.organizer_id),
        },
        Role::Participant => (BROWSABLE.to_vec(), req.organizer_id),
    };

    let (trending_since, page, page_size) = if req.trending {
        (
            Some(Utc::now() - Duration::hours(TRENDING_WINDOW_HOURS)),
            1,
            TRENDING_LIMIT,
        )
    } else {
        (None, req.page, req.page_size)
    };

    EventFilter {
        search: req.search.clone(),
        kind: req.kind,
        eligibility: req.eligibility,
        statuses,
        organizer_id,
        starts_after: req.start_date,
        starts_before: req.end_date,
        trending_since,
        page,
        page_size,
    }
}

#[async_trait]
impl EventQueryServiceTrait for EventQueryService {
    async fn find_by_id(
        &self,
        actor: &Actor,
        event_id: i32,
    ) -> Result<ApiResponse<EventResponse>, ServiceError> {
        let ctx = self.tracer.start(
            "GetEvent",
            vec![
                KeyValue::new("component", "event"),
                KeyValue::new("event.id", event_id.to_string()),
            ],
        );

        let result: Result<_, ServiceError> = async {
            let event = load_event(&self.query, event_id).await?;
            if event.status == EventStatus::Draft && !(actor.is_admin() || actor.owns(&event)) {
                return Err(ServiceError::NotFound(format!("Event {event_id}")));
            }
            Ok(ApiResponse::success(
                "Event retrieved successfully",
                EventResponse::from(event),
            ))
        }
        .await;

        self.tracer.finish(&ctx, result, "Event retrieved")
    }

    async fn find_all(
        &self,
        actor: &Actor,
        req: &FindAllEvents,
    ) -> Result<ApiResponsePagination<Vec<EventResponse>>, ServiceError> {
        let ctx = self.tracer.start(
            "ListEvents",
            vec![
                KeyValue::new("component", "event"),
                KeyValue::new("page", req.page.to_string()),
                KeyValue::new("page_size", req.page_size.to_string()),
            ],
        );

        let result: Result<_, ServiceError> = async {
            req.validate().map_err(invalid)?;
            if let (Some(from), Some(to)) = (req.start_date, req.end_date) {
                if from > to {
                    return Err(ServiceError::Validation(vec![
                        "start_date must not be after end_date".into(),
                    ]));
                }
            }

            let filter = browse_filter(actor, req);
            let (events, total) = self.query.find_all(&filter).await?;

            let pagination = if filter.trending_since.is_some() {
                info!("🔥 {} trending events", events.len());
                Pagination::new(1, TRENDING_LIMIT, events.len() as i64)
            } else {
                info!("📋 Listed {} of {} events", events.len(), total);
                Pagination::new(req.page, req.page_size, total)
            };

            Ok(ApiResponsePagination {
                status: "success".into(),
                message: "Events retrieved successfully".into(),
                data: events.into_iter().map(EventResponse::from).collect(),
                pagination,
            })
        }
        .await;

        self.tracer.finish(&ctx, result, "Events listed")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn actor(role: Role) -> Actor {
        Actor {
            user_id: 7,
            role,
            name: "Test".into(),
            email: "t@campus.edu".into(),
            participant_class: None,
        }
    }

    #[test]
    fn participants_only_browse_open_events() {
        let req = FindAllEvents {
            status: Some(EventStatus::Draft),
            ..Default::default()
        };
        let filter = browse_filter(&actor(Role::Participant), &req);
        assert_eq!(filter.statuses, BROWSABLE.to_vec());
    }

    #[test]
    fn organizers_see_their_own_drafts() {
        let req = FindAllEvents {
            mine: true,
            ..Default::default()
        };
        let filter = browse_filter(&actor(Role::Organizer), &req);
        assert!(filter.statuses.is_empty());
        assert_eq!(filter.organizer_id, Some(7));
    }

    #[test]
    fn trending_takes_the_first_five_of_the_last_day() {
        let req = FindAllEvents {
            trending: true,
            page: 3,
            page_size: 50,
            ..Default::default()
        };
        let filter = browse_filter(&actor(Role::Participant), &req);
        assert_eq!((filter.page, filter.page_size), (1, TRENDING_LIMIT));

        let since = filter.trending_since.unwrap();
        let window = Utc::now() - since;
        assert!(window >= Duration::hours(24) && window < Duration::hours(25));
    }

    #[test]
    fn admins_filter_by_any_status() {
        let req = FindAllEvents {
            status: Some(EventStatus::Draft),
            ..Default::default()
        };
        let filter = browse_filter(&actor(Role::Admin), &req);
        assert_eq!(filter.statuses, vec![EventStatus::Draft]);
    }
}
