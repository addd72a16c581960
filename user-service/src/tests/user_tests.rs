use axum::http::StatusCode;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;
use user_crud_shared::test_utils::http_test_utils::{
    json_request, raw_json_request, response_to_json,
};
use user_crud_shared::test_utils::memory_user_store::MemoryUserStore;
use uuid::Uuid;

use super::utils::{TestApp, PREFIXES};
use crate::routes;

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_crud_scenario_on_both_paths() {
    let app = TestApp::new();

    for prefix in PREFIXES {
        let tag = prefix.trim_start_matches('/');

        // Create
        let (status, user) = app
            .send(
                "POST",
                &format!("{prefix}/users/"),
                Some(json!({"name": "John Doe", "email": format!("john.{tag}@x.com"), "age": 30})),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        let user_id = user["id"].as_str().unwrap().to_string();
        assert!(Uuid::parse_str(&user_id).is_ok());

        // Read all
        let (status, users) = app.send("GET", &format!("{prefix}/users/"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(users
            .as_array()
            .unwrap()
            .iter()
            .any(|u| u["id"] == user_id.as_str()));

        // Read one
        let (status, fetched) = app
            .send("GET", &format!("{prefix}/users/{user_id}"), None)
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(fetched["name"], "John Doe");
        assert_eq!(fetched["age"], 30);

        // Update
        let update = json!({
            "name": "Jane Doe",
            "email": format!("jane.{tag}@x.com"),
            "age": 31
        });
        let (status, updated) = app
            .send("PUT", &format!("{prefix}/users/{user_id}"), Some(update))
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["name"], "Jane Doe");
        assert_eq!(updated["age"], 31);
        assert_eq!(updated["id"], user_id.as_str());

        // Delete
        let (status, body) = app
            .send("DELETE", &format!("{prefix}/users/{user_id}"), None)
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"message": "User deleted"}));

        // Gone
        let (status, body) = app
            .send("GET", &format!("{prefix}/users/{user_id}"), None)
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["detail"], "User not found");
        assert_eq!(body["status"], 404);
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_get_users_empty() {
    let app = TestApp::new();

    for prefix in PREFIXES {
        let (status, body) = app.send("GET", &format!("{prefix}/users/"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([]));

        // Route without the trailing slash behaves the same
        let (status, body) = app.send("GET", &format!("{prefix}/users"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([]));
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_create_ignores_client_id() {
    let app = TestApp::new();
    let supplied = Uuid::new_v4().to_string();

    for prefix in PREFIXES {
        let email = format!("{}@x.com", prefix.trim_start_matches('/'));
        let (status, body) = app
            .send(
                "POST",
                &format!("{prefix}/users/"),
                Some(json!({"id": supplied, "name": "A", "email": email, "age": 1})),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_ne!(body["id"], supplied.as_str());
        assert_eq!(body["email"], email.as_str());
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_duplicate_email_is_bad_request() {
    let app = TestApp::new();
    app.create_user("/sync", "First", "dup@x.com", 20).await;

    for prefix in PREFIXES {
        let (status, body) = app
            .send(
                "POST",
                &format!("{prefix}/users/"),
                Some(json!({"name": "Second", "email": "dup@x.com", "age": 21})),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["detail"]
            .as_str()
            .unwrap()
            .contains("UNIQUE constraint failed"));
    }

    let (_, users) = app.send("GET", "/async/users/", None).await;
    assert_eq!(users.as_array().unwrap().len(), 1);
    assert_eq!(users[0]["name"], "First");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_duplicate_creates_across_paths() {
    let app = TestApp::new();
    let payload = json!({"name": "Racer", "email": "race@x.com", "age": 5});

    let requests = (0..6).map(|i| {
        let router = app.router.clone();
        let uri = format!("{}/users/", PREFIXES[i % 2]);
        let payload = payload.clone();
        tokio::spawn(async move {
            router
                .oneshot(json_request("POST", &uri, Some(payload)))
                .await
                .unwrap()
                .status()
        })
    });

    let mut statuses = Vec::new();
    for request in requests.collect::<Vec<_>>() {
        statuses.push(request.await.unwrap());
    }

    assert_eq!(statuses.iter().filter(|s| **s == StatusCode::OK).count(), 1);
    assert!(statuses
        .iter()
        .all(|s| *s == StatusCode::OK || *s == StatusCode::BAD_REQUEST));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_create_validation_errors() {
    let app = TestApp::new();

    let invalid_bodies = [
        json!({"name": "No Age", "email": "a@x.com"}),
        json!({"email": "b@x.com", "age": 3}),
        json!({"name": "Text Age", "email": "c@x.com", "age": "thirty"}),
        json!({"name": 5, "email": "d@x.com", "age": 3}),
    ];

    for prefix in PREFIXES {
        for body in &invalid_bodies {
            let (status, error) = app
                .send("POST", &format!("{prefix}/users/"), Some(body.clone()))
                .await;
            assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "body: {body}");
            assert_eq!(error["status"], 422);
        }

        let response = app
            .router
            .clone()
            .oneshot(raw_json_request("POST", &format!("{prefix}/users/"), "{not json"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    let (_, users) = app.send("GET", "/sync/users/", None).await;
    assert_eq!(users, json!([]));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_partial_update_keeps_omitted_fields() {
    let app = TestApp::new();

    for prefix in PREFIXES {
        let email = format!("{}@x.com", prefix.trim_start_matches('/'));
        let id = app.create_user(prefix, "Partial", &email, 44).await;

        // Zero is an explicit value and must overwrite
        let (status, body) = app
            .send(
                "PUT",
                &format!("{prefix}/users/{id}"),
                Some(json!({"age": 0})),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["age"], 0);
        assert_eq!(body["name"], "Partial");
        assert_eq!(body["email"], email.as_str());

        let (_, fetched) = app.send("GET", &format!("{prefix}/users/{id}"), None).await;
        assert_eq!(fetched, body);
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_empty_update_is_noop() {
    let app = TestApp::new();

    for prefix in PREFIXES {
        let email = format!("{}@x.com", prefix.trim_start_matches('/'));
        let id = app.create_user(prefix, "Same", &email, 9).await;
        let (_, before) = app.send("GET", &format!("{prefix}/users/{id}"), None).await;

        for _ in 0..2 {
            let (status, body) = app
                .send("PUT", &format!("{prefix}/users/{id}"), Some(json!({})))
                .await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(body, before);
        }
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_update_validation_errors_leave_user_unchanged() {
    let app = TestApp::new();

    let invalid_patches = [
        json!({"age": "old"}),
        json!({"name": 7}),
        json!({"email": ["typed@x.com"]}),
        json!("age"),
    ];

    for prefix in PREFIXES {
        let email = format!("{}@x.com", prefix.trim_start_matches('/'));
        let id = app.create_user(prefix, "Typed", &email, 33).await;
        let uri = format!("{prefix}/users/{id}");
        let (_, before) = app.send("GET", &uri, None).await;

        for patch in &invalid_patches {
            let (status, error) = app.send("PUT", &uri, Some(patch.clone())).await;
            assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "patch: {patch}");
            assert_eq!(error["status"], 422);
            assert!(error["detail"].is_string());
        }

        let response = app
            .router
            .clone()
            .oneshot(raw_json_request("PUT", &uri, "{\"age\": "))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let (status, after) = app.send("GET", &uri, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(after, before);
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_update_to_taken_email_is_rejected_and_rolled_back() {
    let app = TestApp::new();
    app.create_user("/sync", "Owner", "owner@x.com", 50).await;
    let id = app.create_user("/async", "Other", "other@x.com", 51).await;

    for prefix in PREFIXES {
        let (status, body) = app
            .send(
                "PUT",
                &format!("{prefix}/users/{id}"),
                Some(json!({"name": "Changed", "email": "owner@x.com"})),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["detail"].as_str().unwrap().contains("UNIQUE"));

        let (_, fetched) = app.send("GET", &format!("{prefix}/users/{id}"), None).await;
        assert_eq!(fetched["name"], "Other");
        assert_eq!(fetched["email"], "other@x.com");
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_unknown_id_is_not_found() {
    let app = TestApp::new();
    let missing = Uuid::new_v4();

    for prefix in PREFIXES {
        let uri = format!("{prefix}/users/{missing}");
        let requests: [(&str, Option<Value>); 3] = [
            ("GET", None),
            ("PUT", Some(json!({"name": "Nobody"}))),
            ("DELETE", None),
        ];

        for (method, body) in requests {
            let (status, error) = app.send(method, &uri, body).await;
            assert_eq!(status, StatusCode::NOT_FOUND, "{method} {uri}");
            assert_eq!(error["detail"], "User not found");
        }
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_deleted_user_stays_gone() {
    let app = TestApp::new();
    let id = app.create_user("/async", "Temp", "temp@x.com", 3).await;

    let (status, _) = app.send("DELETE", &format!("/sync/users/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);

    for prefix in PREFIXES {
        let (status, _) = app.send("DELETE", &format!("{prefix}/users/{id}"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let (status, _) = app
            .send("PUT", &format!("{prefix}/users/{id}"), Some(json!({})))
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    // The email is free again once the record is gone
    app.create_user("/sync", "Temp", "temp@x.com", 3).await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_malformed_id_is_validation_error() {
    let app = TestApp::new();

    for prefix in PREFIXES {
        let (status, body) = app
            .send("GET", &format!("{prefix}/users/not-a-uuid"), None)
            .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["status"], 422);
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_paths_share_one_store() {
    let app = TestApp::new();
    let id = app.create_user("/sync", "Shared", "shared@x.com", 60).await;

    let (status, body) = app.send("GET", &format!("/async/users/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Shared");
}

#[tokio::test]
async fn test_health_and_fallback() {
    let app = TestApp::new();

    let (status, body) = app.send("GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "ok"}));

    for uri in ["/nowhere", "/sync/accounts", "/async/users/a/b"] {
        let (status, body) = app.send("GET", uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "uri: {uri}");
        assert_eq!(body["status"], 404);
        assert!(body["detail"].is_string());
    }
}

#[tokio::test]
async fn test_router_with_memory_stores() {
    let router = routes::create_router_with_stores(
        Arc::new(MemoryUserStore::new()),
        Arc::new(MemoryUserStore::new()),
    );

    let response = router
        .clone()
        .oneshot(json_request(
            "POST",
            "/sync/users/",
            Some(json!({"name": "Mem", "email": "mem@x.com", "age": 1})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let created = response_to_json(response).await;
    let id = created["id"].as_str().unwrap();

    // Each path is bound to its own store here
    let response = router
        .clone()
        .oneshot(json_request("GET", &format!("/async/users/{id}"), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = router
        .oneshot(json_request(
            "PUT",
            &format!("/sync/users/{id}"),
            Some(json!({"age": 2})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let updated = response_to_json(response).await;
    assert_eq!(updated["age"], 2);
    assert_eq!(updated["name"], "Mem");
}
