pub mod user_handlers;

use async_trait::async_trait;
use axum::{
    extract::{FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use uuid::Uuid;

use crate::error::AppError;

/// JSON body extractor whose rejections become validation errors, so a
/// missing field, a wrong type or a malformed body never reaches the store.
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => {
                log::debug!("Rejected request body: {}", rejection.body_text());
                Err(AppError::Validation(rejection.body_text()))
            }
        }
    }
}

// Path ids are parsed by hand so a malformed id reports like any other
// validation failure.
pub fn parse_user_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|err| {
        log::debug!("Invalid user id in path: {} ({})", raw, err);
        AppError::Validation(format!("Invalid user id `{raw}`: {err}"))
    })
}
