use crate::{domain::requests::event::EventFilter, model::event::Event as EventModel};
use async_trait::async_trait;
use shared::errors::RepositoryError;
use std::sync::Arc;

pub type DynEventQueryRepository = Arc<dyn EventQueryRepositoryTrait + Send + Sync>;

#[async_trait]
pub trait EventQueryRepositoryTrait {
    /// Loads the event with its merchandise items.
    async fn find_by_id(&self, event_id: i32) -> Result<Option<EventModel>, RepositoryError>;
    async fn find_all(
        &self,
        filter: &EventFilter,
    ) -> Result<(Vec<EventModel>, i64), RepositoryError>;
}
