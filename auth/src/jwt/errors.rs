use thiserror::Error;

/// Error type for session token operations.
///
/// `TokenExpired` is kept separate from `InvalidToken` so request handling can
/// tell the user "session expired" instead of a generic rejection.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum JwtError {
    #[error("Failed to encode token: {0}")]
    EncodingFailed(String),

    #[error("Token is expired")]
    TokenExpired,

    #[error("Token is invalid: {0}")]
    InvalidToken(String),
}
