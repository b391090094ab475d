//! Integration tests for the record create/list API, including the
//! readiness gate and the uniqueness policy.

mod common;

use axum::http::StatusCode;
use common::{body_json, get, post_json};
use serde_json::json;
use sqlx::PgPool;

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_record_returns_201_with_stored_record(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = post_json(
        app,
        "/api/v1/records",
        json!({ "name": "Ada", "email": "ada@x.io" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);

    let body = body_json(response).await;
    assert_eq!(body["data"]["name"], "Ada");
    assert_eq!(body["data"]["email"], "ada@x.io");
    assert!(body["data"]["id"].is_i64());
    assert!(body["data"]["created_at"].is_string());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_record_trims_whitespace(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = post_json(
        app,
        "/api/v1/records",
        json!({ "name": "  Ada  ", "email": "  ada@x.io  " }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);

    let body = body_json(response).await;
    assert_eq!(body["data"]["name"], "Ada");
    assert_eq!(body["data"]["email"], "ada@x.io");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_with_empty_name_is_rejected(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let response = post_json(
        app,
        "/api/v1/records",
        json!({ "name": "", "email": "ada@x.io" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["code"], "VALIDATION_ERROR");

    // Nothing reached the store.
    let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM records")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count.0, 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_with_empty_email_is_rejected(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = post_json(
        app,
        "/api/v1/records",
        json!({ "name": "Ada", "email": "  " }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_with_malformed_email_is_rejected(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = post_json(
        app,
        "/api/v1/records",
        json!({ "name": "Ada", "email": "not-an-email" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn duplicate_email_is_rejected_and_stores_one_row(pool: PgPool) {
    let payload = json!({ "name": "Ada", "email": "ada@x.io" });

    let first = post_json(
        common::build_test_app(pool.clone()),
        "/api/v1/records",
        payload.clone(),
    )
    .await;
    assert_eq!(first.status(), StatusCode::CREATED);

    let second = post_json(common::build_test_app(pool.clone()), "/api/v1/records", payload).await;
    assert_eq!(second.status(), StatusCode::CONFLICT);
    let body = body_json(second).await;
    assert_eq!(body["code"], "DUPLICATE_KEY");

    let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM records")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count.0, 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn duplicate_email_is_allowed_when_policy_disabled(pool: PgPool) {
    let mut config = common::test_config();
    config.enforce_unique_email = false;

    let payload = json!({ "name": "Ada", "email": "ada@x.io" });

    for _ in 0..2 {
        let app = common::build_test_app_with_config(pool.clone(), config.clone());
        let response = post_json(app, "/api/v1/records", payload.clone()).await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM records")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count.0, 2);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn list_returns_records_oldest_first(pool: PgPool) {
    for (name, email) in [("Ada", "ada@x.io"), ("Grace", "grace@x.io")] {
        let app = common::build_test_app(pool.clone());
        let response = post_json(
            app,
            "/api/v1/records",
            json!({ "name": name, "email": email }),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let response = get(common::build_test_app(pool), "/api/v1/records").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    let data = body["data"].as_array().unwrap();
    assert_eq!(data.len(), 2);
    assert_eq!(data[0]["name"], "Ada");
    assert_eq!(data[1]["name"], "Grace");
}

#[tokio::test]
async fn create_before_readiness_fails_fast_with_not_ready() {
    let app = common::build_not_ready_app();
    let response = post_json(
        app,
        "/api/v1/records",
        json!({ "name": "Ada", "email": "ada@x.io" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body = body_json(response).await;
    assert_eq!(body["code"], "NOT_READY");
}

#[tokio::test]
async fn list_before_readiness_fails_fast_with_not_ready() {
    let app = common::build_not_ready_app();
    let response = get(app, "/api/v1/records").await;

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body = body_json(response).await;
    assert_eq!(body["code"], "NOT_READY");
}

/// Validation runs before the readiness gate: bad fields are rejected
/// with 400 even while the store is not ready.
#[tokio::test]
async fn validation_precedes_readiness_gate() {
    let app = common::build_not_ready_app();
    let response = post_json(
        app,
        "/api/v1/records",
        json!({ "name": "", "email": "ada@x.io" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["code"], "VALIDATION_ERROR");
}
