pub mod http_test_utils;
pub mod memory_user_store;
pub mod test_database;
pub mod test_logging;
