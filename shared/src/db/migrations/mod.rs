//! Schema steps for the users database. Step `n` (1-based) brings the
//! schema to version `n`, recorded in `PRAGMA user_version`.

use std::cmp::Ordering;

use rusqlite::Connection;

use crate::db::{DbError, DbResult};

const SCHEMA_STEPS: &[&str] = &[include_str!("0001_users.sql")];

pub fn latest_version() -> u32 {
    SCHEMA_STEPS.len() as u32
}

/// Brings the schema up to [`latest_version`]. Pending steps run in a single
/// transaction, so a failing step leaves the previous version in place.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    let from = current_user_version(conn)?;
    let latest = latest_version();

    match from.cmp(&latest) {
        Ordering::Equal => return Ok(()),
        Ordering::Greater => {
            return Err(DbError::UnsupportedSchemaVersion {
                db_version: from,
                latest_supported: latest,
            })
        }
        Ordering::Less => {}
    }

    let tx = conn.transaction()?;
    for (version, sql) in (1u32..).zip(SCHEMA_STEPS).skip(from as usize) {
        log::info!("event=db_migrate module=db status=apply version={}", version);
        tx.execute_batch(sql)?;
        tx.pragma_update(None, "user_version", version)?;
    }
    tx.commit()?;

    Ok(())
}

pub fn current_user_version(conn: &Connection) -> DbResult<u32> {
    Ok(conn.pragma_query_value(None, "user_version", |row| row.get(0))?)
}
