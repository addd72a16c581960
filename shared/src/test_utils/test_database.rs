use std::sync::Arc;

use tempfile::TempDir;

use crate::db::DatabaseConfig;
use crate::store::StoreGateway;

/// A bootstrapped SQLite database in its own temporary directory.
///
/// The directory, and the database with it, is removed when the value is
/// dropped, so keep it alive for as long as the gateway is in use.
pub struct TestDatabase {
    pub gateway: Arc<StoreGateway>,
    _dir: TempDir,
}

impl TestDatabase {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let config = DatabaseConfig::new(dir.path().join("users.db"));
        let gateway = StoreGateway::open(config).unwrap();

        Self {
            gateway: Arc::new(gateway),
            _dir: dir,
        }
    }
}

impl Default for TestDatabase {
    fn default() -> Self {
        Self::new()
    }
}
