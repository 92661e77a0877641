use crate::{
    domain::requests::registration::RegistrationFilter,
    model::registration::{Registration as RegistrationModel, RegistrationStats},
};
use async_trait::async_trait;
use shared::errors::RepositoryError;
use std::sync::Arc;

pub type DynRegistrationQueryRepository =
    Arc<dyn RegistrationQueryRepositoryTrait + Send + Sync>;

#[async_trait]
pub trait RegistrationQueryRepositoryTrait {
    async fn find_by_id(
        &self,
        registration_id: i32,
    ) -> Result<Option<RegistrationModel>, RepositoryError>;
    async fn find_by_participant_and_event(
        &self,
        participant_id: i32,
        event_id: i32,
    ) -> Result<Option<RegistrationModel>, RepositoryError>;
    async fn find_by_ticket(
        &self,
        event_id: i32,
        ticket_id: &str,
    ) -> Result<Option<RegistrationModel>, RepositoryError>;
    async fn find_by_event(
        &self,
        filter: &RegistrationFilter,
    ) -> Result<(Vec<RegistrationModel>, i64), RepositoryError>;
    async fn find_by_participant(
        &self,
        participant_id: i32,
    ) -> Result<Vec<RegistrationModel>, RepositoryError>;
    /// Attended registrations, most recent check-in first.
    async fn find_attendees(
        &self,
        event_id: i32,
    ) -> Result<Vec<RegistrationModel>, RepositoryError>;
    async fn aggregate_stats(&self, event_id: i32) -> Result<RegistrationStats, RepositoryError>;
}
