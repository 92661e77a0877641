use crate::{
    domain::{patch::EventPatch, requests::event::CreateEventRequest},
    model::event::{Event as EventModel, EventStatus},
};
use async_trait::async_trait;
use shared::errors::RepositoryError;
use std::sync::Arc;

pub type DynEventCommandRepository = Arc<dyn EventCommandRepositoryTrait + Send + Sync>;

#[async_trait]
pub trait EventCommandRepositoryTrait {
    async fn create_event(
        &self,
        organizer_id: i32,
        req: &CreateEventRequest,
    ) -> Result<EventModel, RepositoryError>;

    /// Applies an already-vetted patch, provided the event is still in
    /// `expected_status`; otherwise fails with `Conflict` and writes nothing.
    async fn update_event(
        &self,
        event_id: i32,
        expected_status: EventStatus,
        patch: &EventPatch,
    ) -> Result<EventModel, RepositoryError>;
}
