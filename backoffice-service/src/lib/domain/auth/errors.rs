use auth::JwtError;
use auth::PasswordError;
use auth::PasswordPolicyError;
use thiserror::Error;

use crate::domain::user::errors::UserError;

/// Errors produced by the authentication flows.
///
/// The credential-facing variants deliberately carry no detail about which
/// step failed: `InvalidCredentials` covers unknown user, missing hash, and
/// wrong password alike, and `InvalidOrExpiredCode` / `InvalidOrExpiredToken`
/// cover consumed, expired, and never-issued artifacts alike.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("No account found for {0}")]
    UnknownIdentity(String),

    #[error("Account has no phone number on record")]
    MissingPhoneNumber,

    #[error("Invalid or expired verification code")]
    InvalidOrExpiredCode,

    #[error("Invalid or expired reset token")]
    InvalidOrExpiredToken,

    #[error("Weak password: {0}")]
    WeakPassword(#[from] PasswordPolicyError),

    #[error("Google authentication is not configured")]
    FederationNotConfigured,

    #[error("Google token rejected: {0}")]
    FederationRejected(String),

    // Request-auth outcomes for the access guard
    #[error("Session has been closed")]
    TokenRevoked,

    #[error("Session has expired")]
    TokenExpired,

    #[error("Invalid token")]
    TokenInvalid,

    #[error("Failed to send notification: {0}")]
    SendFailed(String),

    #[error(transparent)]
    User(#[from] UserError),

    #[error("Password error: {0}")]
    Password(#[from] PasswordError),

    #[error("Token error: {0}")]
    Jwt(JwtError),

    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl From<JwtError> for AuthError {
    fn from(err: JwtError) -> Self {
        match err {
            JwtError::TokenExpired => AuthError::TokenExpired,
            JwtError::InvalidToken(_) => AuthError::TokenInvalid,
            other => AuthError::Jwt(other),
        }
    }
}
