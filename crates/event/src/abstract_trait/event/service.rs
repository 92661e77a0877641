use crate::domain::{
    identity::Actor,
    patch::EventPatch,
    requests::event::{CreateEventRequest, FindAllEvents},
    response::{
        api::{ApiResponse, ApiResponsePagination},
        event::EventResponse,
    },
};
use async_trait::async_trait;
use shared::errors::ServiceError;
use std::sync::Arc;

pub type DynEventCommandService = Arc<dyn EventCommandServiceTrait + Send + Sync>;
pub type DynEventQueryService = Arc<dyn EventQueryServiceTrait + Send + Sync>;

#[async_trait]
pub trait EventCommandServiceTrait {
    async fn create_event(
        &self,
        actor: &Actor,
        req: &CreateEventRequest,
    ) -> Result<ApiResponse<EventResponse>, ServiceError>;
    async fn update_event(
        &self,
        actor: &Actor,
        event_id: i32,
        patch: &EventPatch,
    ) -> Result<ApiResponse<EventResponse>, ServiceError>;
}

#[async_trait]
pub trait EventQueryServiceTrait {
    async fn find_by_id(
        &self,
        actor: &Actor,
        event_id: i32,
    ) -> Result<ApiResponse<EventResponse>, ServiceError>;
    async fn find_all(
        &self,
        actor: &Actor,
        req: &FindAllEvents,
    ) -> Result<ApiResponsePagination<Vec<EventResponse>>, ServiceError>;
}
