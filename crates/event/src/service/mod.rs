pub mod admission;
pub mod analytics;
pub mod attendance;
pub mod credential;
pub mod event;
pub mod feedback;
pub mod notify;
pub mod organizer;
pub mod payment;
pub mod registration;
pub mod validation;

use crate::{
    abstract_trait::{
        event::repository::DynEventQueryRepository,
        registration::repository::DynRegistrationQueryRepository,
    },
    model::{event::Event, registration::Registration},
};
use shared::errors::ServiceError;

pub(crate) async fn load_event(
    repository: &DynEventQueryRepository,
    event_id: i32,
) -> Result<Event, ServiceError> {
    repository
        .find_by_id(event_id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("Event {event_id}")))
}

pub(crate) async fn load_registration(
    repository: &DynRegistrationQueryRepository,
    registration_id: i32,
) -> Result<Registration, ServiceError> {
    repository
        .find_by_id(registration_id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("Registration {registration_id}")))
}
