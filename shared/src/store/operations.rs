//! The user operation set, written once against [`SessionProvider`].
//!
//! Every function opens exactly one session and runs one logical statement
//! in it. Both store adapters call these functions; neither carries SQL of
//! its own.

use rusqlite::{params, Row, Transaction};
use uuid::Uuid;

use super::{SessionMode, SessionProvider};
use crate::error::{Result, ServiceError};
use crate::models::{User, UserPatch, UserRecord};

const USER_SELECT_SQL: &str = "SELECT id, name, email, age FROM users";

/// Inserts a new user under a freshly generated id and returns the stored
/// row. Email uniqueness is left to the table constraint.
pub fn create_user<P>(provider: &P, user: User) -> Result<UserRecord>
where
    P: SessionProvider,
{
    let record = UserRecord::with_fresh_id(user);
    provider.with_session(SessionMode::Write, |tx| {
        tx.execute(
            "INSERT INTO users (id, name, email, age) VALUES (?1, ?2, ?3, ?4)",
            params![
                record.id.to_string(),
                record.name.as_str(),
                record.email.as_str(),
                record.age
            ],
        )?;
        require_user(tx, record.id)
    })
}

pub fn list_users<P>(provider: &P) -> Result<Vec<UserRecord>>
where
    P: SessionProvider,
{
    provider.with_session(SessionMode::Read, |tx| {
        let mut stmt = tx.prepare(&format!("{USER_SELECT_SQL} ORDER BY rowid"))?;
        let mut rows = stmt.query([])?;
        let mut users = Vec::new();

        while let Some(row) = rows.next()? {
            users.push(parse_user_row(row)?);
        }

        Ok(users)
    })
}

pub fn get_user<P>(provider: &P, id: Uuid) -> Result<UserRecord>
where
    P: SessionProvider,
{
    provider.with_session(SessionMode::Read, |tx| require_user(tx, id))
}

/// Applies `patch` to the user identified by `id`.
///
/// A missing user short-circuits before anything is written. An empty patch
/// writes nothing and returns the stored row unchanged.
pub fn update_user<P>(provider: &P, id: Uuid, patch: UserPatch) -> Result<UserRecord>
where
    P: SessionProvider,
{
    provider.with_session(SessionMode::Write, |tx| {
        let mut record = require_user(tx, id)?;
        if patch.is_empty() {
            return Ok(record);
        }

        patch.apply(&mut record);
        tx.execute(
            "UPDATE users SET name = ?1, email = ?2, age = ?3 WHERE id = ?4",
            params![
                record.name.as_str(),
                record.email.as_str(),
                record.age,
                id.to_string()
            ],
        )?;

        require_user(tx, id)
    })
}

pub fn delete_user<P>(provider: &P, id: Uuid) -> Result<()>
where
    P: SessionProvider,
{
    provider.with_session(SessionMode::Write, |tx| {
        require_user(tx, id)?;
        tx.execute("DELETE FROM users WHERE id = ?1", [id.to_string()])?;
        Ok(())
    })
}

fn find_user(tx: &Transaction<'_>, id: Uuid) -> Result<Option<UserRecord>> {
    let mut stmt = tx.prepare(&format!("{USER_SELECT_SQL} WHERE id = ?1"))?;
    let mut rows = stmt.query([id.to_string()])?;
    if let Some(row) = rows.next()? {
        return Ok(Some(parse_user_row(row)?));
    }

    Ok(None)
}

fn require_user(tx: &Transaction<'_>, id: Uuid) -> Result<UserRecord> {
    find_user(tx, id)?.ok_or(ServiceError::UserNotFound(id))
}

fn parse_user_row(row: &Row<'_>) -> Result<UserRecord> {
    let id_text: String = row.get("id")?;
    let id = Uuid::parse_str(&id_text).map_err(|_| {
        ServiceError::StorageError(format!("invalid uuid value `{id_text}` in users.id"))
    })?;

    Ok(UserRecord {
        id,
        name: row.get("name")?,
        email: row.get("email")?,
        age: row.get("age")?,
    })
}
