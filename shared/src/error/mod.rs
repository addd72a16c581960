use thiserror::Error;
use uuid::Uuid;

use crate::db::DbError;

pub type Result<T> = std::result::Result<T, ServiceError>;

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("User not found: {0}")]
    UserNotFound(Uuid),

    /// Any failure raised inside a store session. The message is the
    /// underlying storage message and is surfaced to API callers as-is.
    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl ServiceError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ServiceError::UserNotFound(_))
    }
}

impl From<rusqlite::Error> for ServiceError {
    fn from(err: rusqlite::Error) -> Self {
        ServiceError::StorageError(err.to_string())
    }
}

impl From<DbError> for ServiceError {
    fn from(err: DbError) -> Self {
        ServiceError::StorageError(err.to_string())
    }
}
