use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use super::one_time_code::MessageResponseData;
use super::ApiError;
use super::ApiSuccess;
use crate::inbound::http::router::AppState;

/// Always answers 200 with the same message, whether or not the email maps
/// to an account.
pub async fn forgot_password(
    State(state): State<AppState>,
    Json(body): Json<ForgotPasswordRequest>,
) -> Result<ApiSuccess<MessageResponseData>, ApiError> {
    if body.email.is_empty() {
        return Err(ApiError::BadRequest("email is required".to_string()));
    }

    state
        .auth_service
        .forgot_password(&body.email)
        .await
        .map_err(ApiError::from)
        .map(|()| {
            ApiSuccess::new(
                StatusCode::OK,
                MessageResponseData {
                    message: "If the email is registered, a reset link has been sent".to_string(),
                },
            )
        })
}

pub async fn reset_password(
    State(state): State<AppState>,
    Json(body): Json<ResetPasswordRequest>,
) -> Result<ApiSuccess<MessageResponseData>, ApiError> {
    if body.token.is_empty() || body.new_password.is_empty() {
        return Err(ApiError::BadRequest(
            "token and new_password are required".to_string(),
        ));
    }

    state
        .auth_service
        .reset_password(&body.token, &body.new_password)
        .await
        .map_err(ApiError::from)
        .map(|()| {
            ApiSuccess::new(
                StatusCode::OK,
                MessageResponseData {
                    message: "Password updated successfully".to_string(),
                },
            )
        })
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ForgotPasswordRequest {
    email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ResetPasswordRequest {
    token: String,
    new_password: String,
}
