//! Repository for the `records` table.
//!
//! Records are create-and-read only: there is no update or delete
//! surface. Email uniqueness is a handler-level policy (lookup before
//! write), not a schema constraint, so it can be toggled off without a
//! migration.

use sqlx::PgPool;

use crate::models::record::Record;

/// Column list for `records` queries.
const COLUMNS: &str = "id, name, email, created_at";

/// Provides data access for records.
pub struct RecordRepo;

impl RecordRepo {
    /// Insert a new record and return the stored row.
    ///
    /// `created_at` is assigned by the database.
    pub async fn insert(pool: &PgPool, name: &str, email: &str) -> Result<Record, sqlx::Error> {
        let query = format!(
            "INSERT INTO records (name, email) VALUES ($1, $2) RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Record>(&query)
            .bind(name)
            .bind(email)
            .fetch_one(pool)
            .await
    }

    /// List all records, oldest first.
    pub async fn list(pool: &PgPool) -> Result<Vec<Record>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM records ORDER BY created_at, id");
        sqlx::query_as::<_, Record>(&query).fetch_all(pool).await
    }

    /// Find a record by its email identifier.
    ///
    /// Used by the create handler's lookup-before-write uniqueness check.
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<Record>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM records WHERE email = $1 LIMIT 1");
        sqlx::query_as::<_, Record>(&query)
            .bind(email)
            .fetch_optional(pool)
            .await
    }
}
