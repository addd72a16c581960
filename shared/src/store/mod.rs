use async_trait::async_trait;
use rusqlite::{Transaction, TransactionBehavior};
use uuid::Uuid;

use crate::error::Result;
use crate::models::{User, UserPatch, UserRecord};

pub mod blocking;
pub mod gateway;
pub mod operations;
pub mod suspending;

pub use blocking::BlockingUserStore;
pub use gateway::StoreGateway;
pub use suspending::SuspendingUserStore;

/// Kind of unit-of-work a session is opened for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionMode {
    Read,
    Write,
}

impl SessionMode {
    pub(crate) fn behavior(self) -> TransactionBehavior {
        match self {
            // Writers take the write lock up front so a read-then-write
            // session never has to upgrade its lock mid-transaction.
            SessionMode::Write => TransactionBehavior::Immediate,
            SessionMode::Read => TransactionBehavior::Deferred,
        }
    }

    pub(crate) fn as_str(self) -> &'static str {
        match self {
            SessionMode::Read => "read",
            SessionMode::Write => "write",
        }
    }
}

/// Hands out one scoped session per operation.
///
/// `with_session` opens the session, runs `op` inside a transaction, commits
/// when `op` succeeds and rolls back otherwise. The session is released
/// before returning on every path.
pub trait SessionProvider: Send + Sync + 'static {
    fn with_session<T, F>(&self, mode: SessionMode, op: F) -> Result<T>
    where
        F: FnOnce(&Transaction<'_>) -> Result<T>;
}

/// UserStore trait defining the interface the HTTP handlers are written
/// against. Both calling conventions implement it.
#[async_trait]
pub trait UserStore: Send + Sync + 'static {
    /// Creates a new user with a freshly generated id
    async fn create_user(&self, user: User) -> Result<UserRecord>;

    /// Gets all users in storage order
    async fn get_users(&self) -> Result<Vec<UserRecord>>;

    /// Gets a user by ID
    async fn get_user(&self, id: Uuid) -> Result<UserRecord>;

    /// Applies a partial update to a user
    async fn update_user(&self, id: Uuid, patch: UserPatch) -> Result<UserRecord>;

    /// Deletes a user
    async fn delete_user(&self, id: Uuid) -> Result<()>;
}
