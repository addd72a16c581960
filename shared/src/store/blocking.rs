use std::sync::Arc;

use async_trait::async_trait;
use tokio::runtime::{Handle, RuntimeFlavor};
use uuid::Uuid;

use super::{operations, SessionProvider, UserStore};
use crate::error::Result;
use crate::models::{User, UserPatch, UserRecord};

/// Runs every operation to completion on the calling worker.
///
/// On a multi-threaded runtime the worker is marked as blocking first so
/// the scheduler can move its other tasks elsewhere; on a current-thread
/// runtime (or outside tokio) the operation simply runs inline.
pub struct BlockingUserStore<P> {
    provider: Arc<P>,
}

impl<P: SessionProvider> BlockingUserStore<P> {
    pub fn new(provider: Arc<P>) -> Self {
        Self { provider }
    }

    fn run<T>(&self, op: impl FnOnce(&P) -> Result<T>) -> Result<T> {
        let provider = self.provider.as_ref();
        match Handle::try_current() {
            Ok(handle) if handle.runtime_flavor() == RuntimeFlavor::MultiThread => {
                tokio::task::block_in_place(|| op(provider))
            }
            _ => op(provider),
        }
    }
}

#[async_trait]
impl<P: SessionProvider> UserStore for BlockingUserStore<P> {
    async fn create_user(&self, user: User) -> Result<UserRecord> {
        self.run(|provider| operations::create_user(provider, user))
    }

    async fn get_users(&self) -> Result<Vec<UserRecord>> {
        self.run(|provider| operations::list_users(provider))
    }

    async fn get_user(&self, id: Uuid) -> Result<UserRecord> {
        self.run(|provider| operations::get_user(provider, id))
    }

    async fn update_user(&self, id: Uuid, patch: UserPatch) -> Result<UserRecord> {
        self.run(|provider| operations::update_user(provider, id, patch))
    }

    async fn delete_user(&self, id: Uuid) -> Result<()> {
        self.run(|provider| operations::delete_user(provider, id))
    }
}
