use std::sync::Arc;

use auth::check_strength;
use auth::PasswordHasher;
use chrono::Duration;
use chrono::Utc;
use rand::RngCore;

use crate::domain::auth::errors::AuthError;
use crate::domain::auth::ports::PasswordResetRepository;
use crate::domain::user::ports::UserRepository;

/// Password-Reset Manager.
///
/// Issues and consumes the single-use opaque tokens that let a user change
/// their password through an emailed link. Token consumption and the password
/// overwrite commit as one transaction inside the repository.
pub struct PasswordResetManager<UR, RR>
where
    UR: UserRepository,
    RR: PasswordResetRepository,
{
    users: Arc<UR>,
    resets: Arc<RR>,
    hasher: PasswordHasher,
    ttl_minutes: i64,
}

impl<UR, RR> PasswordResetManager<UR, RR>
where
    UR: UserRepository,
    RR: PasswordResetRepository,
{
    pub fn new(users: Arc<UR>, resets: Arc<RR>, ttl_minutes: i64) -> Self {
        Self {
            users,
            resets,
            hasher: PasswordHasher::new(),
            ttl_minutes,
        }
    }

    /// Issue a reset token for `email`, replacing any prior one.
    ///
    /// Returns `None` for an unknown email so the caller can answer
    /// success-shaped either way and never confirm account existence.
    pub async fn issue(&self, email: &str) -> Result<Option<String>, AuthError> {
        if self.users.find_by_email(email).await?.is_none() {
            tracing::debug!("Password reset requested for unknown email");
            return Ok(None);
        }

        let token = generate_token();
        let expires_at = Utc::now() + Duration::minutes(self.ttl_minutes);

        self.resets.replace(email, &token, expires_at).await?;

        tracing::info!(email = %email, "Password reset token issued");

        Ok(Some(token))
    }

    /// Consume a token and set the new password.
    ///
    /// # Errors
    /// * `WeakPassword` - new password fails the strength policy
    /// * `InvalidOrExpiredToken` - no unconsumed, unexpired matching token
    /// * `Password` - hashing failed
    pub async fn consume(&self, token: &str, new_password: &str) -> Result<(), AuthError> {
        check_strength(new_password)?;

        let new_hash = self.hasher.hash(new_password)?;

        let email = self
            .resets
            .consume_and_update_password(token, &new_hash)
            .await?
            .ok_or(AuthError::InvalidOrExpiredToken)?;

        tracing::info!(email = %email, "Password reset completed");

        Ok(())
    }
}

/// 32 random bytes as 64 hex characters, 256 bits of entropy.
fn generate_token() -> String {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::auth::service::tests::sample_user;
    use crate::domain::auth::service::tests::MockResets;
    use crate::domain::auth::service::tests::MockUsers;

    #[test]
    fn test_generated_tokens_are_64_hex_chars() {
        let token = generate_token();
        assert_eq!(token.len(), 64);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(token, generate_token());
    }

    #[tokio::test]
    async fn test_issue_unknown_email_is_silent() {
        let mut users = MockUsers::new();
        users.expect_find_by_email().returning(|_| Ok(None));
        let mut resets = MockResets::new();
        resets.expect_replace().times(0);

        let manager = PasswordResetManager::new(Arc::new(users), Arc::new(resets), 60);
        let result = manager.issue("ghost@example.com").await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_issue_stores_token() {
        let mut users = MockUsers::new();
        users
            .expect_find_by_email()
            .returning(|_| Ok(Some(sample_user())));
        let mut resets = MockResets::new();
        resets
            .expect_replace()
            .withf(|email, token, _| email == "ana@example.com" && token.len() == 64)
            .times(1)
            .returning(|_, _, _| Ok(()));

        let manager = PasswordResetManager::new(Arc::new(users), Arc::new(resets), 60);
        let token = manager.issue("ana@example.com").await.unwrap();
        assert!(token.is_some());
    }

    #[tokio::test]
    async fn test_consume_rejects_weak_password() {
        let users = MockUsers::new();
        let mut resets = MockResets::new();
        resets.expect_consume_and_update_password().times(0);

        let manager = PasswordResetManager::new(Arc::new(users), Arc::new(resets), 60);
        let result = manager.consume("sometoken", "short").await;
        assert!(matches!(result, Err(AuthError::WeakPassword(_))));
    }

    #[tokio::test]
    async fn test_consume_invalid_token() {
        let users = MockUsers::new();
        let mut resets = MockResets::new();
        resets
            .expect_consume_and_update_password()
            .returning(|_, _| Ok(None));

        let manager = PasswordResetManager::new(Arc::new(users), Arc::new(resets), 60);
        let result = manager.consume("sometoken", "Abcdef1!").await;
        assert!(matches!(result, Err(AuthError::InvalidOrExpiredToken)));
    }

    #[tokio::test]
    async fn test_consume_hashes_before_storing() {
        let users = MockUsers::new();
        let mut resets = MockResets::new();
        resets
            .expect_consume_and_update_password()
            .withf(|token, hash| token == "sometoken" && hash.starts_with("$argon2"))
            .times(1)
            .returning(|_, _| Ok(Some("ana@example.com".to_string())));

        let manager = PasswordResetManager::new(Arc::new(users), Arc::new(resets), 60);
        manager.consume("sometoken", "Abcdef1!").await.unwrap();
    }
}
