use axum::{
    extract::{Path, State},
    Json,
};
use std::sync::Arc;
use user_crud_shared::models::{MessageResponse, User, UserPatch};
use user_crud_shared::store::UserStore;

use super::{parse_user_id, ValidatedJson};
use crate::error::Result;

// POST /users/
pub async fn create_user<S>(
    State(store): State<Arc<S>>,
    ValidatedJson(payload): ValidatedJson<User>,
) -> Result<Json<User>>
where
    S: UserStore,
{
    if payload.id.is_some() {
        log::debug!("Ignoring client supplied id on create");
    }

    let created = store.create_user(payload).await?;
    log::info!("Created user: id={}", created.id);

    Ok(Json(User::from(created)))
}

// GET /users/
pub async fn get_users<S>(State(store): State<Arc<S>>) -> Result<Json<Vec<User>>>
where
    S: UserStore,
{
    let users = store.get_users().await?;

    Ok(Json(users.into_iter().map(User::from).collect()))
}

// GET /users/:id
pub async fn get_user<S>(State(store): State<Arc<S>>, Path(id): Path<String>) -> Result<Json<User>>
where
    S: UserStore,
{
    let id = parse_user_id(&id)?;
    let user = store.get_user(id).await?;

    Ok(Json(User::from(user)))
}

// PUT /users/:id
pub async fn update_user<S>(
    State(store): State<Arc<S>>,
    Path(id): Path<String>,
    ValidatedJson(patch): ValidatedJson<UserPatch>,
) -> Result<Json<User>>
where
    S: UserStore,
{
    let id = parse_user_id(&id)?;
    let updated = store.update_user(id, patch).await?;
    log::info!("Updated user: id={}", updated.id);

    Ok(Json(User::from(updated)))
}

// DELETE /users/:id
pub async fn delete_user<S>(
    State(store): State<Arc<S>>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>>
where
    S: UserStore,
{
    let id = parse_user_id(&id)?;
    store.delete_user(id).await?;
    log::info!("Deleted user: id={}", id);

    Ok(Json(MessageResponse::new("User deleted")))
}
