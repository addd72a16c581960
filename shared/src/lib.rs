pub mod db;
pub mod error;
pub mod models;
pub mod store;


// Test utilities - publicly exposed with test feature
#[cfg(any(test, feature = "test_utils"))]
pub mod test_utils;
