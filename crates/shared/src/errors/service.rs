use crate::errors::repository::RepositoryError;
use chrono::{DateTime, Utc};
use jsonwebtoken::errors::Error as JwtError;
use rdkafka::error::KafkaError;
use thiserror::Error;

pub const REGISTRATION_UNIQUE_CONSTRAINT: &str = "registrations_participant_event_key";
pub const FEEDBACK_UNIQUE_CONSTRAINT: &str = "event_feedback_participant_event_key";

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Repository error: {0}")]
    Repo(RepositoryError),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Events in status '{status}' cannot modify: {}", .fields.join(", "))]
    PolicyViolation { status: String, fields: Vec<String> },

    #[error("Cannot move event from '{from}' to '{to}'")]
    InvalidTransition { from: String, to: String },

    #[error("Event is not open for registration")]
    EventNotOpen,

    #[error("Registration deadline has passed")]
    DeadlinePassed,

    #[error("Registration limit reached")]
    CapacityExceeded,

    #[error("This event is only for {0} participants")]
    NotEligible(String),

    #[error("You are already registered for this event")]
    AlreadyRegistered,

    #[error("You have already submitted feedback for this event")]
    FeedbackExists,

    #[error("Insufficient stock for item {0}")]
    InsufficientStock(String),

    #[error("Max purchase limit for {item} is {limit}")]
    LimitExceeded { item: String, limit: i32 },

    #[error("Payment has already been reviewed")]
    AlreadyReviewed,

    #[error("Invalid ticket")]
    InvalidTicket,

    #[error("Attendance already marked at {0}")]
    AlreadyMarked(DateTime<Utc>),

    #[error("Registration is not confirmed")]
    RegistrationNotConfirmed,

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Validation failed: {0:?}")]
    Validation(Vec<String>),

    #[error("JWT error: {0}")]
    Jwt(#[from] JwtError),

    #[error("Token has expired")]
    TokenExpired,

    #[error("Kafka error: {0}")]
    Kafka(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<RepositoryError> for ServiceError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound => ServiceError::NotFound("record".into()),
            RepositoryError::AlreadyExists(constraint)
                if constraint == REGISTRATION_UNIQUE_CONSTRAINT =>
            {
                ServiceError::AlreadyRegistered
            }
            RepositoryError::AlreadyExists(constraint)
                if constraint == FEEDBACK_UNIQUE_CONSTRAINT =>
            {
                ServiceError::FeedbackExists
            }
            RepositoryError::AlreadyExists(constraint) => ServiceError::Conflict(constraint),
            RepositoryError::Conflict(msg) => ServiceError::Conflict(msg),
            RepositoryError::EventNotOpen => ServiceError::EventNotOpen,
            RepositoryError::CapacityExceeded => ServiceError::CapacityExceeded,
            RepositoryError::InsufficientStock(item_id) => {
                ServiceError::InsufficientStock(item_id.to_string())
            }
            RepositoryError::AlreadyReviewed => ServiceError::AlreadyReviewed,
            RepositoryError::AlreadyMarked(at) => ServiceError::AlreadyMarked(at),
            RepositoryError::NotConfirmed => ServiceError::RegistrationNotConfirmed,
            other => ServiceError::Repo(other),
        }
    }
}

impl From<KafkaError> for ServiceError {
    fn from(error: KafkaError) -> Self {
        ServiceError::Kafka(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_registration_constraint_maps_to_already_registered() {
        let err = ServiceError::from(RepositoryError::AlreadyExists(
            REGISTRATION_UNIQUE_CONSTRAINT.to_string(),
        ));
        assert!(matches!(err, ServiceError::AlreadyRegistered));
    }

    #[test]
    fn duplicate_feedback_constraint_maps_to_feedback_exists() {
        let err = ServiceError::from(RepositoryError::AlreadyExists(
            FEEDBACK_UNIQUE_CONSTRAINT.to_string(),
        ));
        assert!(matches!(err, ServiceError::FeedbackExists));
    }

    #[test]
    fn other_unique_constraints_map_to_conflict() {
        let err = ServiceError::from(RepositoryError::AlreadyExists(
            "registrations_ticket_id_key".to_string(),
        ));
        assert!(matches!(err, ServiceError::Conflict(_)));
    }

    #[test]
    fn constraint_outcomes_become_domain_errors() {
        assert!(matches!(
            ServiceError::from(RepositoryError::CapacityExceeded),
            ServiceError::CapacityExceeded
        ));
        assert!(matches!(
            ServiceError::from(RepositoryError::InsufficientStock(7)),
            ServiceError::InsufficientStock(ref item) if item == "7"
        ));
        assert!(matches!(
            ServiceError::from(RepositoryError::NotConfirmed),
            ServiceError::RegistrationNotConfirmed
        ));
    }

    #[test]
    fn policy_violation_names_offending_fields() {
        let err = ServiceError::PolicyViolation {
            status: "published".into(),
            fields: vec!["name".into(), "registration_fee".into()],
        };
        assert_eq!(
            err.to_string(),
            "Events in status 'published' cannot modify: name, registration_fee"
        );
    }
}
