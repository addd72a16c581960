//! SQLite connection bootstrap and schema migrations.
//!
//! Every store session opens its own connection through [`open_connection`];
//! [`bootstrap`] is run once at process start so the `users` table exists
//! before any session is handed out.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use log::{error, info};
use rusqlite::Connection;
use thiserror::Error;

pub mod migrations;

pub const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_secs(5);

pub type DbResult<T> = std::result::Result<T, DbError>;

#[derive(Error, Debug)]
pub enum DbError {
    #[error("{0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("database schema version {db_version} is newer than supported {latest_supported}")]
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
}

/// Where the users database lives and how long a session waits on a locked
/// database before giving up.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub path: PathBuf,
    pub busy_timeout: Duration,
}

impl DatabaseConfig {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            busy_timeout: DEFAULT_BUSY_TIMEOUT,
        }
    }

    pub fn with_busy_timeout(mut self, busy_timeout: Duration) -> Self {
        self.busy_timeout = busy_timeout;
        self
    }
}

/// Opens a new connection configured for one store session.
pub fn open_connection(config: &DatabaseConfig) -> DbResult<Connection> {
    let conn = Connection::open(&config.path)?;
    conn.busy_timeout(config.busy_timeout)?;
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    Ok(conn)
}

/// Opens the database, switches it to WAL mode and applies pending
/// migrations. Safe to call on every start: existing data is never touched.
pub fn bootstrap(config: &DatabaseConfig) -> DbResult<()> {
    let started_at = Instant::now();
    info!(
        "event=db_bootstrap module=db status=start path={}",
        config.path.display()
    );

    let result = open_connection(config).and_then(|mut conn| {
        // journal_mode answers with a row, so it cannot go through execute_batch
        conn.query_row("PRAGMA journal_mode = WAL;", [], |row| row.get::<_, String>(0))?;
        migrations::apply_migrations(&mut conn)
    });

    match &result {
        Ok(()) => info!(
            "event=db_bootstrap module=db status=ok schema_version={} duration_ms={}",
            migrations::latest_version(),
            started_at.elapsed().as_millis()
        ),
        Err(err) => error!(
            "event=db_bootstrap module=db status=error duration_ms={} error={}",
            started_at.elapsed().as_millis(),
            err
        ),
    }

    result
}
