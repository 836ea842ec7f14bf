use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;

use super::one_time_code::MessageResponseData;
use super::ApiError;
use super::ApiSuccess;
use super::UserResponseData;
use crate::inbound::http::middleware::AuthenticatedUser;
use crate::inbound::http::middleware::BearerToken;
use crate::inbound::http::router::AppState;

/// Echo the authenticated user from a fresh database read, so a deleted
/// account stops validating even with a live token.
pub async fn verify_session(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
) -> Result<ApiSuccess<UserResponseData>, ApiError> {
    state
        .auth_service
        .current_user(&auth.user_id)
        .await
        .map_err(ApiError::from)
        .map(|ref user| ApiSuccess::new(StatusCode::OK, user.into()))
}

pub async fn logout(
    State(state): State<AppState>,
    Extension(token): Extension<BearerToken>,
) -> Result<ApiSuccess<MessageResponseData>, ApiError> {
    state
        .auth_service
        .logout(&token.0)
        .await
        .map_err(ApiError::from)
        .map(|()| {
            ApiSuccess::new(
                StatusCode::OK,
                MessageResponseData {
                    message: "Session closed".to_string(),
                },
            )
        })
}
