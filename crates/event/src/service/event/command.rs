use crate::{
    abstract_trait::{
        event::{
            repository::{DynEventCommandRepository, DynEventQueryRepository},
            service::EventCommandServiceTrait,
        },
        organizer::DynOrganizerRepository,
    },
    domain::{
        identity::{Actor, Role},
        patch::EventPatch,
        requests::event::{CreateEventRequest, NewMerchandiseItem},
        response::{api::ApiResponse, event::EventResponse},
    },
    model::event::{Event, EventStatus},
    service::{
        load_event,
        notify::Notifications,
        validation::{EventShape, invalid, validate_event_shape},
    },
};
use async_trait::async_trait;
use opentelemetry::KeyValue;
use shared::{errors::ServiceError, utils::OperationTracer};
use tracing::{info, warn};
use validator::Validate;

pub struct EventCommandServiceDeps {
    pub query: DynEventQueryRepository,
    pub command: DynEventCommandRepository,
    pub organizers: DynOrganizerRepository,
    pub notifications: Notifications,
    pub tracer: OperationTracer,
}

#[derive(Clone)]
pub struct EventCommandService {
    query: DynEventQueryRepository,
    command: DynEventCommandRepository,
    organizers: DynOrganizerRepository,
    notifications: Notifications,
    tracer: OperationTracer,
}

impl EventCommandService {
    pub fn new(deps: EventCommandServiceDeps) -> Self {
        let EventCommandServiceDeps {
            query,
            command,
            organizers,
            notifications,
            tracer,
        } = deps;

        Self {
            query,
            command,
            organizers,
            notifications,
            tracer,
        }
    }

    async fn create(
        &self,
        actor: &Actor,
        req: &CreateEventRequest,
    ) -> Result<ApiResponse<EventResponse>, ServiceError> {
        actor.require_role(Role::Organizer)?;
        req.validate().map_err(invalid)?;
        validate_event_shape(&EventShape {
            kind: req.kind,
            start_time: req.start_time,
            end_time: req.end_time,
            form_fields: &req.form_fields,
            items: &req.items,
        })?;

        let event = self.command.create_event(actor.user_id, req).await?;
        info!(
            "🗓️ Organizer {} drafted event {} '{}'",
            actor.user_id, event.event_id, event.name
        );

        Ok(ApiResponse::success(
            "Event created successfully",
            EventResponse::from(event),
        ))
    }

    async fn update(
        &self,
        actor: &Actor,
        event_id: i32,
        patch: &EventPatch,
    ) -> Result<ApiResponse<EventResponse>, ServiceError> {
        let current = load_event(&self.query, event_id).await?;
        actor.require_manager(&current)?;

        if patch.is_empty() {
            return Err(ServiceError::Validation(vec![
                "update must contain at least one field".into(),
            ]));
        }
        patch.check_policy(current.status)?;

        let transition = patch.status_change(current.status);
        if let Some(next) = transition {
            if !current.status.can_transition_to(next) {
                return Err(ServiceError::InvalidTransition {
                    from: current.status.to_string(),
                    to: next.to_string(),
                });
            }
        }

        check_values(&current, patch)?;

        let updated = self
            .command
            .update_event(event_id, current.status, patch)
            .await?;

        if let Some(next) = transition {
            info!(
                "🔁 Event {} moved from {} to {}",
                event_id, current.status, next
            );
        }
        if current.status == EventStatus::Draft && transition == Some(EventStatus::Published) {
            self.announce(&updated).await;
        }

        Ok(ApiResponse::success(
            "Event updated successfully",
            EventResponse::from(updated),
        ))
    }

    /// Looks up the organizer's webhook and hands the post to a background
    /// task. Never fails the caller.
    async fn announce(&self, event: &Event) {
        match self.organizers.find_webhook(event.organizer_id).await {
            Ok(Some(url)) => self.notifications.event_published(url, event),
            Ok(None) => {}
            Err(e) => warn!(
                "⚠️ Could not load webhook for organizer {}: {e}",
                event.organizer_id
            ),
        }
    }
}

/// Value checks for whatever the patch carries. The resulting draft is
/// re-validated as a whole so kind/content mismatches are caught too.
fn check_values(current: &Event, patch: &EventPatch) -> Result<(), ServiceError> {
    let mut problems = Vec::new();

    if patch.name.as_ref().is_some_and(|n| n.trim().is_empty()) {
        problems.push("name must not be empty".to_string());
    }
    if patch
        .description
        .as_ref()
        .is_some_and(|d| d.trim().is_empty())
    {
        problems.push("description must not be empty".to_string());
    }
    if patch.registration_fee.is_some_and(|fee| fee < 0) {
        problems.push("registration_fee must be at least 0".to_string());
    }
    if let Some(limit) = patch.registration_limit {
        if limit < 0 {
            problems.push("registration_limit must be at least 0".to_string());
        } else if limit != 0 && limit < current.registration_count {
            problems.push(format!(
                "registration_limit must be 0 or at least the {} admitted participants",
                current.registration_count
            ));
        }
    }
    if !problems.is_empty() {
        return Err(ServiceError::Validation(problems));
    }

    if current.status != EventStatus::Draft {
        return Ok(());
    }

    let mut candidate = current.clone();
    patch.apply_to(&mut candidate);
    let items: Vec<NewMerchandiseItem> = match &patch.items {
        Some(items) => items.clone(),
        None => current
            .items
            .iter()
            .map(|item| NewMerchandiseItem {
                name: item.name.clone(),
                price: item.price,
                stock: item.stock,
                purchase_limit: item.purchase_limit,
                variants: item.variants.clone(),
            })
            .collect(),
    };

    validate_event_shape(&EventShape {
        kind: candidate.kind,
        start_time: candidate.start_time,
        end_time: candidate.end_time,
        form_fields: &candidate.form_fields,
        items: &items,
    })
}

#[async_trait]
impl EventCommandServiceTrait for EventCommandService {
    async fn create_event(
        &self,
        actor: &Actor,
        req: &CreateEventRequest,
    ) -> Result<ApiResponse<EventResponse>, ServiceError> {
        let ctx = self.tracer.start(
            "CreateEvent",
            vec![
                KeyValue::new("component", "event"),
                KeyValue::new("event.organizer_id", actor.user_id.to_string()),
                KeyValue::new("event.kind", req.kind.to_string()),
            ],
        );

        let result = self.create(actor, req).await;
        self.tracer.finish(&ctx, result, "Event created")
    }

    async fn update_event(
        &self,
        actor: &Actor,
        event_id: i32,
        patch: &EventPatch,
    ) -> Result<ApiResponse<EventResponse>, ServiceError> {
        let ctx = self.tracer.start(
            "UpdateEvent",
            vec![
                KeyValue::new("component", "event"),
                KeyValue::new("event.id", event_id.to_string()),
                KeyValue::new("actor.id", actor.user_id.to_string()),
            ],
        );

        let result = self.update(actor, event_id, patch).await;
        self.tracer.finish(&ctx, result, "Event updated")
    }
}
