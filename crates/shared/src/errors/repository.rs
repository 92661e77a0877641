use chrono::{DateTime, Utc};
use sqlx::Error as SqlxError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Database error: {0}")]
    Sqlx(SqlxError),

    #[error("Not found")]
    NotFound,

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Already exists: {0}")]
    AlreadyExists(String),

    #[error("Foreign key violation: {0}")]
    ForeignKey(String),

    #[error("Event is not open for registration")]
    EventNotOpen,

    #[error("Registration limit reached")]
    CapacityExceeded,

    #[error("Insufficient stock for item {0}")]
    InsufficientStock(i32),

    #[error("Registration has already been reviewed")]
    AlreadyReviewed,

    #[error("Attendance already marked at {0}")]
    AlreadyMarked(DateTime<Utc>),

    #[error("Registration is not confirmed")]
    NotConfirmed,

    #[error("Custom: {0}")]
    Custom(String),
}

impl From<SqlxError> for RepositoryError {
    fn from(err: SqlxError) -> Self {
        match &err {
            SqlxError::RowNotFound => RepositoryError::NotFound,
            SqlxError::Database(db) if db.is_unique_violation() => {
                RepositoryError::AlreadyExists(db.constraint().unwrap_or("unique").to_string())
            }
            SqlxError::Database(db) if db.is_foreign_key_violation() => {
                RepositoryError::ForeignKey(db.constraint().unwrap_or("foreign_key").to_string())
            }
            SqlxError::Database(db) if db.is_check_violation() => {
                RepositoryError::Conflict(db.constraint().unwrap_or("check").to_string())
            }
            _ => RepositoryError::Sqlx(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_not_found_becomes_not_found() {
        let err = RepositoryError::from(SqlxError::RowNotFound);
        assert!(matches!(err, RepositoryError::NotFound));
    }

    #[test]
    fn other_sqlx_errors_are_kept() {
        let err = RepositoryError::from(SqlxError::PoolTimedOut);
        assert!(matches!(err, RepositoryError::Sqlx(_)));
    }
}
