use crate::errors::{error::ErrorResponse, repository::RepositoryError, service::ServiceError};
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::{Value, json};
use tracing::error;

#[derive(Debug)]
pub enum HttpError {
    BadRequest(String),
    Unauthorized(String),
    Forbidden(String),
    NotFound(String),
    Conflict(String, Option<Value>),
    Unprocessable(String),
    ServiceUnavailable(String),
    Internal(String),
}

impl From<ServiceError> for HttpError {
    fn from(err: ServiceError) -> Self {
        let message = err.to_string();

        match err {
            ServiceError::NotFound(_) => HttpError::NotFound(message),

            ServiceError::PolicyViolation { .. }
            | ServiceError::InvalidTransition { .. }
            | ServiceError::Validation(_) => HttpError::BadRequest(message),

            ServiceError::EventNotOpen
            | ServiceError::DeadlinePassed
            | ServiceError::CapacityExceeded
            | ServiceError::InsufficientStock(_)
            | ServiceError::LimitExceeded { .. }
            | ServiceError::RegistrationNotConfirmed => HttpError::Unprocessable(message),

            ServiceError::AlreadyRegistered
            | ServiceError::FeedbackExists
            | ServiceError::AlreadyReviewed
            | ServiceError::Conflict(_) => HttpError::Conflict(message, None),

            ServiceError::AlreadyMarked(attended_at) => {
                HttpError::Conflict(message, Some(json!({ "attended_at": attended_at })))
            }

            ServiceError::InvalidTicket => HttpError::NotFound(message),

            ServiceError::NotEligible(_) | ServiceError::Forbidden(_) => {
                HttpError::Forbidden(message)
            }

            ServiceError::Unauthorized(_) => HttpError::Forbidden(message),

            ServiceError::Jwt(_) | ServiceError::TokenExpired => HttpError::Unauthorized(message),

            ServiceError::Kafka(_) => HttpError::ServiceUnavailable(message),

            ServiceError::Repo(repo_err) => match repo_err {
                RepositoryError::NotFound => HttpError::NotFound("Not found".into()),
                RepositoryError::Conflict(msg) | RepositoryError::AlreadyExists(msg) => {
                    HttpError::Conflict(msg, None)
                }
                RepositoryError::ForeignKey(msg) => {
                    HttpError::BadRequest(format!("Foreign key violation: {msg}"))
                }
                other => {
                    error!("❌ Unhandled repository error: {other:?}");
                    HttpError::Internal("Repository error".into())
                }
            },

            ServiceError::Internal(msg) => HttpError::Internal(msg),
        }
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let (status, msg, data) = match self {
            HttpError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg, None),
            HttpError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg, None),
            HttpError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg, None),
            HttpError::NotFound(msg) => (StatusCode::NOT_FOUND, msg, None),
            HttpError::Conflict(msg, data) => (StatusCode::CONFLICT, msg, data),
            HttpError::Unprocessable(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg, None),
            HttpError::ServiceUnavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg, None),
            HttpError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg, None),
        };

        let body = Json(ErrorResponse {
            status: "error".into(),
            message: msg,
            data,
        });

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn already_marked_keeps_original_timestamp() {
        let at = Utc::now();
        match HttpError::from(ServiceError::AlreadyMarked(at)) {
            HttpError::Conflict(_, Some(data)) => {
                assert_eq!(data["attended_at"], json!(at));
            }
            other => panic!("unexpected mapping: {other:?}"),
        }
    }

    #[test]
    fn admission_rejections_are_unprocessable() {
        assert!(matches!(
            HttpError::from(ServiceError::CapacityExceeded),
            HttpError::Unprocessable(_)
        ));
        assert!(matches!(
            HttpError::from(ServiceError::AlreadyRegistered),
            HttpError::Conflict(_, None)
        ));
    }
}
