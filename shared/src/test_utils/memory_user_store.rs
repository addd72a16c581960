use std::sync::RwLock;

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::{Result, ServiceError};
use crate::models::{User, UserPatch, UserRecord};
use crate::store::UserStore;

const DUPLICATE_EMAIL: &str = "UNIQUE constraint failed: users.email";

/// MemoryUserStore is a simple in-memory implementation of UserStore for testing
///
/// It keeps users in insertion order and rejects duplicate emails with the
/// same message SQLite produces, so handler tests see the same outcomes as
/// against the real database.
#[derive(Default)]
pub struct MemoryUserStore {
    users: RwLock<Vec<UserRecord>>,
}

impl MemoryUserStore {
    /// Create a new empty MemoryUserStore
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a MemoryUserStore with initial test data
    pub fn with_data(users: Vec<UserRecord>) -> Self {
        Self {
            users: RwLock::new(users),
        }
    }

    fn lock_error() -> ServiceError {
        ServiceError::InternalError("Failed to acquire user store lock".into())
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn create_user(&self, user: User) -> Result<UserRecord> {
        let mut users = self.users.write().map_err(|_| Self::lock_error())?;
        let record = UserRecord::with_fresh_id(user);

        if users.iter().any(|u| u.email == record.email) {
            return Err(ServiceError::StorageError(DUPLICATE_EMAIL.into()));
        }

        users.push(record.clone());
        Ok(record)
    }

    async fn get_users(&self) -> Result<Vec<UserRecord>> {
        let users = self.users.read().map_err(|_| Self::lock_error())?;
        Ok(users.clone())
    }

    async fn get_user(&self, id: Uuid) -> Result<UserRecord> {
        let users = self.users.read().map_err(|_| Self::lock_error())?;
        users
            .iter()
            .find(|u| u.id == id)
            .cloned()
            .ok_or(ServiceError::UserNotFound(id))
    }

    async fn update_user(&self, id: Uuid, patch: UserPatch) -> Result<UserRecord> {
        let mut users = self.users.write().map_err(|_| Self::lock_error())?;
        let index = users
            .iter()
            .position(|u| u.id == id)
            .ok_or(ServiceError::UserNotFound(id))?;

        let mut updated = users[index].clone();
        patch.apply(&mut updated);

        if users.iter().any(|u| u.id != id && u.email == updated.email) {
            return Err(ServiceError::StorageError(DUPLICATE_EMAIL.into()));
        }

        users[index] = updated.clone();
        Ok(updated)
    }

    async fn delete_user(&self, id: Uuid) -> Result<()> {
        let mut users = self.users.write().map_err(|_| Self::lock_error())?;
        let index = users
            .iter()
            .position(|u| u.id == id)
            .ok_or(ServiceError::UserNotFound(id))?;

        users.remove(index);
        Ok(())
    }
}
