//! Handlers for record creation and listing.
//!
//! Both handlers go through the store manager's readiness gate: before
//! the store is connected they return `NotReady` (503) immediately
//! instead of blocking. Validation runs first, so a request with bad
//! fields is rejected without ever touching the store.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use satchel_core::error::CoreError;
use satchel_core::validation::validate_new_record;
use satchel_db::models::record::{CreateRecord, Record};
use satchel_db::repositories::RecordRepo;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/records -- create a record.
///
/// When `enforce_unique_email` is set, an existing record with the same
/// email rejects the create with `DUPLICATE_KEY` (409) via a
/// lookup-before-write check.
pub async fn create_record(
    State(state): State<AppState>,
    Json(dto): Json<CreateRecord>,
) -> AppResult<(StatusCode, Json<DataResponse<Record>>)> {
    validate_new_record(&dto.name, &dto.email)?;

    let name = dto.name.trim();
    let email = dto.email.trim();

    let pool = state.store.pool().await?;

    if state.config.enforce_unique_email
        && RecordRepo::find_by_email(&pool, email).await?.is_some()
    {
        return Err(CoreError::DuplicateKey(format!(
            "a record with email '{email}' already exists"
        ))
        .into());
    }

    let record = RecordRepo::insert(&pool, name, email).await?;
    tracing::info!(id = record.id, "Record created");

    Ok((StatusCode::CREATED, Json(DataResponse { data: record })))
}

/// GET /api/v1/records -- list all records, oldest first.
pub async fn list_records(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<Record>>>> {
    let pool = state.store.pool().await?;
    let records = RecordRepo::list(&pool).await?;
    Ok(Json(DataResponse { data: records }))
}
