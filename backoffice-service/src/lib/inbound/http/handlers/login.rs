use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use super::ApiError;
use super::ApiSuccess;
use super::SessionResponseData;
use crate::inbound::http::router::AppState;

pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<ApiSuccess<SessionResponseData>, ApiError> {
    if body.identifier.is_empty() || body.password.is_empty() {
        return Err(ApiError::BadRequest(
            "identifier and password are required".to_string(),
        ));
    }

    state
        .auth_service
        .login(&body.identifier, &body.password)
        .await
        .map_err(ApiError::from)
        .map(|session| {
            ApiSuccess::new(
                StatusCode::OK,
                SessionResponseData {
                    token: session.token,
                    user: (&session.user).into(),
                },
            )
        })
}

/// Accepts username or email in `identifier`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoginRequest {
    identifier: String,
    password: String,
}
