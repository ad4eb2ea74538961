//! Meeting records repository for database operations.
//!
//! Meeting records map an upstream meeting id to the application that
//! created it. A record is inserted only after the upstream API confirms
//! the creation, and is immutable afterwards; lookups authorize every
//! subsequent read/update/delete on that meeting id.
//!
//! # Security
//!
//! - All queries use parameterized statements (SQL injection safe)
//! - Lookups are scoped to the calling application, so one tenant can
//!   never observe another tenant's meetings

use crate::errors::ProxyError;
use crate::models::MeetingRecordRow;
use crate::observability::metrics;
use sqlx::PgPool;
use std::time::Instant;
use tracing::instrument;
use uuid::Uuid;

/// Meeting records repository for database operations.
pub struct MeetingRecordsRepository;

impl MeetingRecordsRepository {
    /// Insert a meeting ownership record.
    ///
    /// Called only after upstream returned the creation-confirmed status.
    ///
    /// # Arguments
    ///
    /// * `pool` - Database connection pool
    /// * `application_id` - Owning application
    /// * `user_id` - User the meeting was created for
    /// * `meeting_id` - Upstream meeting id
    #[instrument(skip_all, name = "mg.repo.record_meeting", fields(meeting_id = meeting_id))]
    pub async fn record(
        pool: &PgPool,
        application_id: Uuid,
        user_id: &str,
        meeting_id: i64,
    ) -> Result<MeetingRecordRow, ProxyError> {
        let start = Instant::now();

        let row = sqlx::query_as::<_, MeetingRecordRow>(
            r#"
            INSERT INTO meeting_records (application_id, user_id, meeting_id)
            VALUES ($1, $2, $3)
            RETURNING
                record_id, application_id, user_id, meeting_id, created_at
            "#,
        )
        .bind(application_id)
        .bind(user_id)
        .bind(meeting_id)
        .fetch_one(pool)
        .await
        .map_err(|e| {
            metrics::record_db_query("record_meeting", "error", start.elapsed());
            ProxyError::Database(e.to_string())
        })?;

        metrics::record_db_query("record_meeting", "success", start.elapsed());

        tracing::info!(
            target: "mg.repo.meeting_records",
            record_id = %row.record_id,
            application_id = %application_id,
            meeting_id = meeting_id,
            "Saved meeting record"
        );

        Ok(row)
    }

    /// Find the record for exactly this application/meeting id pair.
    ///
    /// Returns `None` when no record exists — including when the meeting
    /// id exists for a different application. Absence is not an error.
    ///
    /// # Arguments
    ///
    /// * `pool` - Database connection pool
    /// * `application_id` - Calling application
    /// * `meeting_id` - Upstream meeting id
    #[instrument(skip_all, name = "mg.repo.find_meeting", fields(meeting_id = meeting_id))]
    pub async fn find(
        pool: &PgPool,
        application_id: Uuid,
        meeting_id: i64,
    ) -> Result<Option<MeetingRecordRow>, ProxyError> {
        let start = Instant::now();

        let row = sqlx::query_as::<_, MeetingRecordRow>(
            r#"
            SELECT record_id, application_id, user_id, meeting_id, created_at
            FROM meeting_records
            WHERE application_id = $1 AND meeting_id = $2
            "#,
        )
        .bind(application_id)
        .bind(meeting_id)
        .fetch_optional(pool)
        .await
        .map_err(|e| {
            metrics::record_db_query("find_meeting", "error", start.elapsed());
            ProxyError::Database(e.to_string())
        })?;

        metrics::record_db_query("find_meeting", "success", start.elapsed());

        Ok(row)
    }
}
