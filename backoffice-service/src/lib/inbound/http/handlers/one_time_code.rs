use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use super::SessionResponseData;
use crate::domain::auth::models::CodeChannel;
use crate::inbound::http::router::AppState;

pub async fn request_email_code(
    State(state): State<AppState>,
    Json(body): Json<RequestCodeRequest>,
) -> Result<ApiSuccess<MessageResponseData>, ApiError> {
    request_code(state, body, CodeChannel::Email).await
}

pub async fn request_sms_code(
    State(state): State<AppState>,
    Json(body): Json<RequestCodeRequest>,
) -> Result<ApiSuccess<MessageResponseData>, ApiError> {
    request_code(state, body, CodeChannel::Sms).await
}

async fn request_code(
    state: AppState,
    body: RequestCodeRequest,
    channel: CodeChannel,
) -> Result<ApiSuccess<MessageResponseData>, ApiError> {
    if body.email.is_empty() {
        return Err(ApiError::BadRequest("email is required".to_string()));
    }

    state
        .auth_service
        .request_code(&body.email, channel)
        .await
        .map_err(ApiError::from)
        .map(|()| {
            ApiSuccess::new(
                StatusCode::OK,
                MessageResponseData {
                    message: "Verification code sent".to_string(),
                },
            )
        })
}

pub async fn verify_code(
    State(state): State<AppState>,
    Json(body): Json<VerifyCodeRequest>,
) -> Result<ApiSuccess<SessionResponseData>, ApiError> {
    if body.email.is_empty() || body.code.is_empty() {
        return Err(ApiError::BadRequest(
            "email and code are required".to_string(),
        ));
    }

    state
        .auth_service
        .verify_code(&body.email, &body.code)
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

/// The SMS variant also takes the email; the code goes to the phone number
/// stored on the account.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RequestCodeRequest {
    email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct VerifyCodeRequest {
    email: String,
    code: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MessageResponseData {
    pub message: String,
}
