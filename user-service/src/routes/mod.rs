use axum::{
    extract::Request,
    middleware,
    routing::get,
    Json, Router,
};
use log::{info, warn};
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::error::AppError;
use crate::handlers::user_handlers::{create_user, delete_user, get_user, get_users, update_user};
use user_crud_shared::store::{BlockingUserStore, StoreGateway, SuspendingUserStore, UserStore};

/// Creates a router serving both calling conventions over one gateway
pub fn create_router(gateway: Arc<StoreGateway>) -> Router {
    info!("Creating router with SQLite store");

    let blocking = Arc::new(BlockingUserStore::new(Arc::clone(&gateway)));
    let suspending = Arc::new(SuspendingUserStore::new(gateway));

    create_router_with_stores(blocking, suspending)
}

/// Creates a router with the given store implementations: `blocking` is
/// mounted under `/sync` and `suspending` under `/async`
pub fn create_router_with_stores<B, A>(blocking: Arc<B>, suspending: Arc<A>) -> Router
where
    B: UserStore,
    A: UserStore,
{
    info!("Setting up API routes under /sync and /async");

    // Configure CORS
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Logging middleware to trace all requests
    async fn logging_middleware(
        req: Request,
        next: axum::middleware::Next,
    ) -> impl axum::response::IntoResponse {
        info!(
            "Router received request: method={}, uri={}",
            req.method(),
            req.uri()
        );
        next.run(req).await
    }

    let router = Router::new()
        .route("/health", get(health))
        .nest("/sync", user_routes(blocking))
        .nest("/async", user_routes(suspending))
        .layer(cors)
        .layer(middleware::from_fn(logging_middleware));

    // Add a fallback handler for 404s
    router.fallback(|req: Request| async move {
        warn!("No route matched for: {} {}", req.method(), req.uri());
        AppError::NotFound("The requested resource was not found".to_string())
    })
}

// The same handler set, bound to one store
fn user_routes<S>(store: Arc<S>) -> Router
where
    S: UserStore,
{
    Router::new()
        .route("/users", get(get_users::<S>).post(create_user::<S>))
        .route("/users/", get(get_users::<S>).post(create_user::<S>))
        .route(
            "/users/:id",
            get(get_user::<S>)
                .put(update_user::<S>)
                .delete(delete_user::<S>),
        )
        .with_state(store)
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
