use axum::{http::StatusCode, Router};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;
use user_crud_shared::test_utils::http_test_utils::{json_request, response_to_json};
use user_crud_shared::test_utils::test_database::TestDatabase;
use user_crud_shared::test_utils::test_logging::init_test_logging;

use crate::routes;

/// Path prefixes of the two handler sets
pub const PREFIXES: [&str; 2] = ["/sync", "/async"];

/// A router over a fresh SQLite database. Keep the value alive for the
/// duration of the test; dropping it deletes the database.
pub struct TestApp {
    pub router: Router,
    _db: TestDatabase,
}

impl TestApp {
    pub fn new() -> Self {
        init_test_logging();
        let db = TestDatabase::new();
        let router = routes::create_router(Arc::clone(&db.gateway));
        Self { router, _db: db }
    }

    /// Sends one request and returns the status with the parsed JSON body
    pub async fn send(&self, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let response = self
            .router
            .clone()
            .oneshot(json_request(method, uri, body))
            .await
            .unwrap();
        let status = response.status();
        (status, response_to_json(response).await)
    }

    /// Creates a user through `prefix` and returns its id
    pub async fn create_user(&self, prefix: &str, name: &str, email: &str, age: i64) -> String {
        let (status, body) = self
            .send(
                "POST",
                &format!("{prefix}/users/"),
                Some(json!({ "name": name, "email": email, "age": age })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "create failed: {body}");
        body["id"].as_str().unwrap().to_string()
    }
}
