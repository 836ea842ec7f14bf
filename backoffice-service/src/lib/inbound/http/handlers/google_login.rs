use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use super::ApiError;
use super::ApiSuccess;
use super::SessionResponseData;
use crate::inbound::http::router::AppState;

pub async fn google_login(
    State(state): State<AppState>,
    Json(body): Json<GoogleLoginRequest>,
) -> Result<ApiSuccess<SessionResponseData>, ApiError> {
    if body.credential.is_empty() {
        return Err(ApiError::BadRequest("credential is required".to_string()));
    }

    state
        .auth_service
        .login_with_google(&body.credential)
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

/// `credential` is the Google-signed id token from the sign-in widget.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GoogleLoginRequest {
    credential: String,
}
