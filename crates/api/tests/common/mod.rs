#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use satchel_api::config::ServerConfig;
use satchel_api::router::build_app_router;
use satchel_api::state::AppState;
use satchel_store::{StoreConfig, StoreManager};

/// Build a test `ServerConfig` with safe defaults.
///
/// The store settings point at nothing routable; tests either attach an
/// externally managed pool or exercise the not-ready path.
pub fn test_config() -> ServerConfig {
    let mut store = StoreConfig::from_env();
    store.data_dir = std::env::temp_dir().join("satchel-api-test");
    store.port = 1;

    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        enforce_unique_email: true,
        store,
    }
}

/// Build the full application router over an already-connected pool.
///
/// Mirrors the router construction in `main.rs` so integration tests
/// exercise the same middleware stack that production uses.
pub fn build_test_app(pool: PgPool) -> Router {
    build_test_app_with_config(pool, test_config())
}

/// Same as [`build_test_app`] but with a caller-supplied config (e.g.
/// to disable uniqueness enforcement).
pub fn build_test_app_with_config(pool: PgPool, config: ServerConfig) -> Router {
    let store = StoreManager::attach_pool(config.store.clone(), pool);
    let state = AppState {
        store,
        config: Arc::new(config.clone()),
    };
    build_app_router(state, &config)
}

/// Build an application whose store manager has never been started, so
/// every store-touching request must fail fast with `NOT_READY`.
pub fn build_not_ready_app() -> Router {
    let config = test_config();
    let store = StoreManager::new(config.store.clone());
    let state = AppState {
        store,
        config: Arc::new(config.clone()),
    };
    build_app_router(state, &config)
}

/// Issue a GET request against the app.
pub async fn get(app: Router, uri: &str) -> Response<Body> {
    app.oneshot(
        Request::builder()
            .method("GET")
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    )
    .await
    .unwrap()
}

/// Issue a POST request with a JSON body against the app.
pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    app.oneshot(
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
    .unwrap()
}

/// Collect a response body into JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
