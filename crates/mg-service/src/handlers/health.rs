//! Health check handler.
//!
//! Provides the liveness/readiness endpoint for deployment probes.

use crate::errors::ProxyError;
use crate::models::HealthResponse;
use crate::routes::AppState;
use axum::extract::State;
use axum::Json;
use std::sync::Arc;
use tracing::instrument;

/// Handler for GET /health
///
/// Pings the database to verify connectivity and returns the service
/// status.
///
/// ## Example Response
///
/// ```json
/// {
///   "status": "healthy",
///   "database": "healthy"
/// }
/// ```
#[instrument(skip_all, name = "mg.health.check")]
pub async fn health_check(State(state): State<Arc<AppState>>) -> Result<Json<HealthResponse>, ProxyError> {
    // Ping database to verify connectivity
    let db_healthy = sqlx::query("SELECT 1").fetch_one(&state.pool).await.is_ok();

    let response = if db_healthy {
        HealthResponse {
            status: "healthy".to_string(),
            database: Some("healthy".to_string()),
        }
    } else {
        // Return unhealthy status but don't error out - orchestrators
        // need to see the response body
        HealthResponse {
            status: "unhealthy".to_string(),
            database: Some("unhealthy".to_string()),
        }
    };

    Ok(Json(response))
}

#[cfg(test)]
mod tests {
    use super::*;

    // The actual handler is tested via integration tests in
    // health_tests.rs.

    #[test]
    fn test_health_response_structure() {
        let response = HealthResponse {
            status: "healthy".to_string(),
            database: Some("healthy".to_string()),
        };

        assert_eq!(response.status, "healthy");
        assert_eq!(response.database, Some("healthy".to_string()));
    }
}
