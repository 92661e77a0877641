use crate::{
    domain::requests::registration::{NewRegistration, PaymentReview, TicketGrant},
    model::registration::Registration as RegistrationModel,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use shared::errors::RepositoryError;
use std::sync::Arc;

pub type DynRegistrationCommandRepository =
    Arc<dyn RegistrationCommandRepositoryTrait + Send + Sync>;

/// Every method is a single all-or-nothing unit against the store.
#[async_trait]
pub trait RegistrationCommandRepositoryTrait {
    /// Inserts the registration and, in the same unit, takes a seat
    /// (`EventNotOpen`/`CapacityExceeded` when none is left). Confirmed
    /// registrations also take stock (`InsufficientStock`) and add revenue.
    /// A second registration for the same pair fails `AlreadyExists`.
    async fn admit(&self, record: &NewRegistration) -> Result<RegistrationModel, RepositoryError>;

    /// `pending` → `approved`: takes stock, issues the ticket, adds revenue.
    async fn approve_payment(
        &self,
        review: &PaymentReview,
        ticket: &TicketGrant,
    ) -> Result<RegistrationModel, RepositoryError>;

    /// `pending` → `rejected`: releases the seat.
    async fn reject_payment(
        &self,
        review: &PaymentReview,
    ) -> Result<RegistrationModel, RepositoryError>;

    async fn attach_payment_proof(
        &self,
        registration_id: i32,
        payment_proof: &str,
    ) -> Result<RegistrationModel, RepositoryError>;

    /// Compare-and-set on the attended flag. `AlreadyMarked(at)` carries the
    /// original mark time; `NotConfirmed` if the registration is not confirmed.
    async fn mark_attended(
        &self,
        registration_id: i32,
        marked_by: i32,
        at: DateTime<Utc>,
    ) -> Result<RegistrationModel, RepositoryError>;

    /// Releases the seat and, for confirmed registrations, restocks and
    /// reverses revenue.
    async fn cancel(&self, registration_id: i32) -> Result<RegistrationModel, RepositoryError>;
}
