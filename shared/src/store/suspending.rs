use std::sync::Arc;

use async_trait::async_trait;
use log::error;
use uuid::Uuid;

use super::{operations, SessionProvider, UserStore};
use crate::error::{Result, ServiceError};
use crate::models::{User, UserPatch, UserRecord};

/// Moves every operation onto tokio's blocking pool and suspends the
/// request until the store answers.
pub struct SuspendingUserStore<P> {
    provider: Arc<P>,
}

impl<P: SessionProvider> SuspendingUserStore<P> {
    pub fn new(provider: Arc<P>) -> Self {
        Self { provider }
    }

    async fn run<T, F>(&self, op: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&P) -> Result<T> + Send + 'static,
    {
        let provider = Arc::clone(&self.provider);
        tokio::task::spawn_blocking(move || op(provider.as_ref()))
            .await
            .map_err(|err| {
                error!("Store task did not complete: {}", err);
                ServiceError::InternalError(format!("store task failed: {err}"))
            })?
    }
}

#[async_trait]
impl<P: SessionProvider> UserStore for SuspendingUserStore<P> {
    async fn create_user(&self, user: User) -> Result<UserRecord> {
        self.run(move |provider| operations::create_user(provider, user))
            .await
    }

    async fn get_users(&self) -> Result<Vec<UserRecord>> {
        self.run(|provider| operations::list_users(provider)).await
    }

    async fn get_user(&self, id: Uuid) -> Result<UserRecord> {
        self.run(move |provider| operations::get_user(provider, id))
            .await
    }

    async fn update_user(&self, id: Uuid, patch: UserPatch) -> Result<UserRecord> {
        self.run(move |provider| operations::update_user(provider, id, patch))
            .await
    }

    async fn delete_user(&self, id: Uuid) -> Result<()> {
        self.run(move |provider| operations::delete_user(provider, id))
            .await
    }
}
