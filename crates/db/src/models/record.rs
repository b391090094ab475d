//! Record entity model and DTOs.

use satchel_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Full record row from the `records` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Record {
    pub id: DbId,
    pub name: String,
    pub email: String,
    /// Assigned by the store at write time (`DEFAULT now()`).
    pub created_at: Timestamp,
}

/// DTO for creating a new record.
#[derive(Debug, Deserialize)]
pub struct CreateRecord {
    pub name: String,
    pub email: String,
}
