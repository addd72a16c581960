use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Persisted form of a user, one row of the `users` table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UserRecord {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub age: i64,
}

impl UserRecord {
    /// Builds a record for insertion from a create payload.
    ///
    /// This is the only place identifiers are minted. Any `id` carried by
    /// the payload is discarded.
    pub fn with_fresh_id(user: User) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: user.name,
            email: user.email,
            age: user.age,
        }
    }
}

// Wire DTO
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct User {
    #[serde(default)]
    pub id: Option<Uuid>,
    pub name: String,
    pub email: String,
    pub age: i64,
}

impl From<UserRecord> for User {
    fn from(record: UserRecord) -> Self {
        Self {
            id: Some(record.id),
            name: record.name,
            email: record.email,
            age: record.age,
        }
    }
}

/// Partial update payload. A field that is absent (or `null`) keeps its
/// stored value; a present field overwrites it, even when it looks like a
/// default (`0`, `""`). Unknown keys, including `id`, are ignored.
#[derive(Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct UserPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub age: Option<i64>,
}

impl UserPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none() && self.age.is_none()
    }

    /// Overwrites the fields of `record` that are present in the patch.
    pub fn apply(self, record: &mut UserRecord) {
        if let Some(name) = self.name {
            record.name = name;
        }

        if let Some(email) = self.email {
            record.email = email;
        }

        if let Some(age) = self.age {
            record.age = age;
        }
    }
}

// Response DTOs for general use across services
#[derive(Serialize, Deserialize, Debug)]
pub struct ErrorResponse {
    pub status: u16,
    pub detail: String,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
