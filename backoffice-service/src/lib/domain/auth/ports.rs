use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;

use crate::domain::auth::errors::AuthError;
use crate::domain::auth::models::GoogleProfile;

/// Storage for one-time verification codes.
#[async_trait]
pub trait VerificationCodeRepository: Send + Sync + 'static {
    /// Remove every outstanding code for `email` and store the new one, as a
    /// single unit. Prevents stale-code replay ambiguity.
    async fn replace(
        &self,
        email: &str,
        code: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), AuthError>;

    /// Atomically consume the most recent matching code. Returns `true` when
    /// an unconsumed, unexpired exact match existed and is now marked used;
    /// `false` covers wrong, already-consumed, and expired codes alike.
    async fn consume(&self, email: &str, code: &str) -> Result<bool, AuthError>;
}

/// Storage for password-reset tokens.
#[async_trait]
pub trait PasswordResetRepository: Send + Sync + 'static {
    /// Remove prior tokens for `email` and store the new one.
    async fn replace(
        &self,
        email: &str,
        token: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), AuthError>;

    /// In one transaction: mark the token used (only if unconsumed and
    /// unexpired) and overwrite the owning user's password hash. Returns the
    /// owning email on success, `None` when no valid token matched. The two
    /// writes commit together, so a concurrent reuse of the same token cannot
    /// also succeed.
    async fn consume_and_update_password(
        &self,
        token: &str,
        new_password_hash: &str,
    ) -> Result<Option<String>, AuthError>;
}

/// Revocation list for session tokens, written on logout and read by the
/// access guard on every protected request.
#[async_trait]
pub trait TokenBlacklistRepository: Send + Sync + 'static {
    /// Record a token as revoked. Idempotent.
    async fn insert(&self, token: &str) -> Result<(), AuthError>;

    /// Exact-string membership check.
    async fn contains(&self, token: &str) -> Result<bool, AuthError>;
}

/// Outbound mail collaborator.
#[async_trait]
pub trait MailSender: Send + Sync + 'static {
    /// Deliver a one-time login code.
    async fn send_verification_code(&self, to: &str, code: &str) -> Result<(), AuthError>;

    /// Deliver a password-reset link carrying the opaque token.
    async fn send_password_reset(&self, to: &str, token: &str) -> Result<(), AuthError>;
}

/// Outbound SMS collaborator.
#[async_trait]
pub trait SmsSender: Send + Sync + 'static {
    async fn send(&self, to: &str, body: &str) -> Result<(), AuthError>;
}

/// Federation collaborator: verifies a Google-signed id token against the
/// configured client id and returns the asserted identity.
#[async_trait]
pub trait GoogleTokenVerifier: Send + Sync + 'static {
    /// # Errors
    /// * `FederationNotConfigured` - no client id configured
    /// * `FederationRejected` - signature, audience, or expiry check failed
    async fn verify(&self, credential: &str) -> Result<GoogleProfile, AuthError>;
}
