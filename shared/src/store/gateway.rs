use std::time::Instant;

use log::{debug, warn};
use rusqlite::Transaction;

use super::{SessionMode, SessionProvider};
use crate::db::{self, DatabaseConfig};
use crate::error::{Result, ServiceError};

/// SQLite-backed session provider. Each session is a fresh connection, so no
/// two concurrent operations ever share one.
#[derive(Debug, Clone)]
pub struct StoreGateway {
    config: DatabaseConfig,
}

impl StoreGateway {
    /// Bootstraps the schema and returns a gateway over the database.
    pub fn open(config: DatabaseConfig) -> Result<Self> {
        db::bootstrap(&config)?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &DatabaseConfig {
        &self.config
    }
}

impl SessionProvider for StoreGateway {
    fn with_session<T, F>(&self, mode: SessionMode, op: F) -> Result<T>
    where
        F: FnOnce(&Transaction<'_>) -> Result<T>,
    {
        let started_at = Instant::now();
        let mut conn = db::open_connection(&self.config)?;
        let tx = conn.transaction_with_behavior(mode.behavior())?;

        // A failed COMMIT leaves the transaction open; dropping it rolls back.
        let outcome = match op(&tx) {
            Ok(value) => tx.commit().map(|()| value).map_err(ServiceError::from),
            Err(err) => {
                if let Err(rollback_err) = tx.rollback() {
                    warn!(
                        "event=db_rollback module=store mode={} status=error error={}",
                        mode.as_str(),
                        rollback_err
                    );
                }
                Err(err)
            }
        };

        match &outcome {
            Ok(_) => debug!(
                "event=db_session module=store mode={} status=ok duration_ms={}",
                mode.as_str(),
                started_at.elapsed().as_millis()
            ),
            Err(err) if err.is_not_found() => debug!(
                "event=db_session module=store mode={} status=not_found duration_ms={}",
                mode.as_str(),
                started_at.elapsed().as_millis()
            ),
            Err(err) => warn!(
                "event=db_session module=store mode={} status=rolled_back duration_ms={} error={}",
                mode.as_str(),
                started_at.elapsed().as_millis(),
                err
            ),
        }

        outcome
    }
}
