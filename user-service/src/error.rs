use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use user_crud_shared::error::ServiceError;
use user_crud_shared::models::ErrorResponse;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Internal server error: {0}")]
    InternalServerError(String),
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::UserNotFound(_) => AppError::NotFound("User not found".into()),
            ServiceError::StorageError(msg) => AppError::BadRequest(msg),
            ServiceError::InternalError(msg) => AppError::InternalServerError(msg),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::NotFound(msg) => {
                log::warn!("Not found error: {}", msg);
                (StatusCode::NOT_FOUND, msg)
            }
            AppError::BadRequest(msg) => {
                log::warn!("Bad request error: {}", msg);
                (StatusCode::BAD_REQUEST, msg)
            }
            AppError::Validation(msg) => {
                log::warn!("Validation error: {}", msg);
                (StatusCode::UNPROCESSABLE_ENTITY, msg)
            }
            AppError::InternalServerError(msg) => {
                log::error!("Internal server error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        log::info!("Returning error response: status={}, message={}", status, message);
        let body = ErrorResponse {
            status: status.as_u16(),
            detail: message,
        };
        (status, Json(body)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
