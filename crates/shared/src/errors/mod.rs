mod error;
mod http;
mod repository;
mod service;

pub use self::error::ErrorResponse;
pub use self::http::HttpError;
pub use self::repository::RepositoryError;
pub use self::service::{FEEDBACK_UNIQUE_CONSTRAINT, REGISTRATION_UNIQUE_CONSTRAINT, ServiceError};
