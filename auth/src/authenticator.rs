use crate::jwt::JwtError;
use crate::jwt::JwtHandler;
use crate::jwt::SessionClaims;
use crate::password::PasswordError;
use crate::password::PasswordHasher;

/// Coordinates password verification and session-token issuance.
///
/// Wraps the Secret Hasher and the Token Issuer/Verifier behind one handle so
/// the orchestrator never touches keys or hash parameters directly.
pub struct Authenticator {
    password_hasher: PasswordHasher,
    jwt_handler: JwtHandler,
}

/// Authentication operation errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthenticationError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Password error: {0}")]
    PasswordError(#[from] PasswordError),

    #[error("JWT error: {0}")]
    JwtError(#[from] JwtError),
}

impl Authenticator {
    /// Create a new authenticator signing with `jwt_secret`.
    pub fn new(jwt_secret: &[u8]) -> Self {
        Self {
            password_hasher: PasswordHasher::new(),
            jwt_handler: JwtHandler::new(jwt_secret),
        }
    }

    /// Hash a password for storage.
    ///
    /// # Errors
    /// * `PasswordError` - hashing operation failed
    pub fn hash_password(&self, password: &str) -> Result<String, PasswordError> {
        self.password_hasher.hash(password)
    }

    /// Verify a password and, on success, issue a session token for `claims`.
    ///
    /// # Errors
    /// * `InvalidCredentials` - password does not match the stored digest
    /// * `PasswordError` - stored digest is malformed
    /// * `JwtError` - token generation failed
    pub fn authenticate(
        &self,
        password: &str,
        stored_hash: &str,
        claims: &SessionClaims,
    ) -> Result<String, AuthenticationError> {
        let is_valid = self.password_hasher.verify(password, stored_hash)?;

        if !is_valid {
            return Err(AuthenticationError::InvalidCredentials);
        }

        Ok(self.jwt_handler.encode(claims)?)
    }

    /// Issue a session token without password verification. Used by the
    /// federated and one-time-code flows, where identity was proven by other
    /// means.
    ///
    /// # Errors
    /// * `JwtError` - token generation failed
    pub fn issue_token(&self, claims: &SessionClaims) -> Result<String, JwtError> {
        self.jwt_handler.encode(claims)
    }

    /// Validate and decode a session token.
    ///
    /// # Errors
    /// * `JwtError::TokenExpired` - past its expiry
    /// * `JwtError::InvalidToken` - bad signature or structure
    pub fn validate_token(&self, token: &str) -> Result<SessionClaims, JwtError> {
        self.jwt_handler.decode(token)
    }
}
