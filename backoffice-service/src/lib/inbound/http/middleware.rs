use axum::extract::Request;
use axum::extract::State;
use axum::http::StatusCode;
use axum::http::{self};
use axum::middleware::Next;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use serde_json::json;

use crate::domain::user::models::Role;
use crate::domain::user::models::UserId;
use crate::inbound::http::router::AppState;

/// Identity resolved by the access guard, stored in request extensions.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: UserId,
    pub role: Role,
    pub username: String,
}

/// Raw bearer token as presented, kept for the logout handler which
/// blacklists it verbatim.
#[derive(Debug, Clone)]
pub struct BearerToken(pub String);

/// Access guard for the protected routes.
///
/// Revoked, expired, and malformed tokens each get their own message so the
/// client can tell "log in again" apart from "this session was closed".
pub async fn authenticate(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, Response> {
    let token = extract_token_from_header(&req)?.to_string();

    let claims = state.auth_service.authorize(&token).await.map_err(|e| {
        tracing::warn!(error = %e, "Token rejected");
        unauthorized(&e.to_string())
    })?;

    let user_id = UserId::from_string(&claims.sub).map_err(|e| {
        tracing::error!(error = %e, "Malformed subject claim");
        unauthorized("Invalid token")
    })?;

    let role = claims.role.parse::<Role>().map_err(|e| {
        tracing::error!(error = %e, "Malformed role claim");
        unauthorized("Invalid token")
    })?;

    req.extensions_mut().insert(AuthenticatedUser {
        user_id,
        role,
        username: claims.username,
    });
    req.extensions_mut().insert(BearerToken(token));

    Ok(next.run(req).await)
}

fn unauthorized(message: &str) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({
            "error": message
        })),
    )
        .into_response()
}

fn extract_token_from_header(req: &Request) -> Result<&str, Response> {
    let auth_header = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .ok_or_else(|| unauthorized("Missing Authorization header"))?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| unauthorized("Invalid Authorization header"))?;

    if !auth_str.starts_with("Bearer ") {
        return Err(unauthorized(
            "Invalid Authorization header format. Expected: Bearer <token>",
        ));
    }

    Ok(auth_str.trim_start_matches("Bearer "))
}
