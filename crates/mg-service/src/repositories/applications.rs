//! Applications repository for database operations.
//!
//! Applications are provisioned implicitly: the first request bearing a
//! new gateway application id creates the row. Provisioning must be safe
//! under concurrent first-contact requests from the same application.
//!
//! # Security
//!
//! - All queries use parameterized statements (SQL injection safe)
//! - The external id uniqueness constraint plus a conflict-tolerant
//!   upsert prevents duplicate rows under races

use crate::errors::ProxyError;
use crate::models::ApplicationRow;
use crate::observability::metrics;
use sqlx::PgPool;
use std::time::Instant;
use tracing::instrument;
use uuid::Uuid;

/// Applications repository for database operations.
pub struct ApplicationsRepository;

impl ApplicationsRepository {
    /// Get or create an application by its gateway-issued external id.
    ///
    /// Idempotent and race-safe: the upsert inserts a new row or touches
    /// the existing one, and `RETURNING` always yields the single row for
    /// this external id. Concurrent first-contact requests observe the
    /// same application.
    ///
    /// The external id is stored in canonical lowercase UUID text form,
    /// so differing header casing maps to one application.
    ///
    /// # Arguments
    ///
    /// * `pool` - Database connection pool
    /// * `external_id` - Application identifier from the gateway header
    #[instrument(skip_all, name = "mg.repo.ensure_application", fields(external_id = %external_id))]
    pub async fn ensure(pool: &PgPool, external_id: Uuid) -> Result<ApplicationRow, ProxyError> {
        let start = Instant::now();

        let row = sqlx::query_as::<_, ApplicationRow>(
            r#"
            INSERT INTO applications (external_id)
            VALUES ($1)
            ON CONFLICT (external_id) DO UPDATE
            SET updated_at = NOW()
            RETURNING
                application_id, external_id, display_name, created_at, updated_at
            "#,
        )
        .bind(external_id.to_string())
        .fetch_one(pool)
        .await
        .map_err(|e| {
            metrics::record_db_query("ensure_application", "error", start.elapsed());
            ProxyError::Database(e.to_string())
        })?;

        metrics::record_db_query("ensure_application", "success", start.elapsed());

        Ok(row)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    // Provisioning behavior (idempotence, concurrent first contact) is
    // exercised against a real database in tests/registry_tests.rs.

    use super::*;
    use chrono::Utc;

    #[test]
    fn test_application_row_fields() {
        let now = Utc::now();
        let row = ApplicationRow {
            application_id: Uuid::nil(),
            external_id: "3fa85f64-5717-4562-b3fc-2c963f66afa6".to_string(),
            display_name: None,
            created_at: now,
            updated_at: now,
        };

        assert_eq!(row.external_id, "3fa85f64-5717-4562-b3fc-2c963f66afa6");
        assert!(row.display_name.is_none());
    }
}
