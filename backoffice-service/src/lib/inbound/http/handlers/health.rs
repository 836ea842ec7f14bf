use axum::extract::State;
use axum::http::StatusCode;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::inbound::http::router::AppState;

/// Liveness plus a database ping; answers 503 when the pool cannot reach
/// Postgres.
pub async fn health(
    State(state): State<AppState>,
) -> Result<ApiSuccess<HealthResponseData>, ApiError> {
    sqlx::query("SELECT 1")
        .execute(&state.pool)
        .await
        .map_err(|e| ApiError::ServiceUnavailable(format!("database unreachable: {e}")))?;

    Ok(ApiSuccess::new(
        StatusCode::OK,
        HealthResponseData {
            status: "ok".to_string(),
        },
    ))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthResponseData {
    pub status: String,
}
