use std::sync::Arc;

use chrono::Duration;
use chrono::Utc;
use rand::Rng;

use crate::domain::auth::errors::AuthError;
use crate::domain::auth::ports::VerificationCodeRepository;
use crate::domain::user::models::User;
use crate::domain::user::ports::UserRepository;

/// One-Time-Code Manager.
///
/// Issues, stores, and consumes the short-lived 6-digit codes used by the
/// email and SMS login flows. All state lives in the shared store, so any
/// number of stateless server instances can issue and consume each other's
/// codes.
pub struct OneTimeCodeManager<UR, CR>
where
    UR: UserRepository,
    CR: VerificationCodeRepository,
{
    users: Arc<UR>,
    codes: Arc<CR>,
    ttl_minutes: i64,
}

impl<UR, CR> OneTimeCodeManager<UR, CR>
where
    UR: UserRepository,
    CR: VerificationCodeRepository,
{
    pub fn new(users: Arc<UR>, codes: Arc<CR>, ttl_minutes: i64) -> Self {
        Self {
            users,
            codes,
            ttl_minutes,
        }
    }

    /// Issue a fresh code for `email`, invalidating any prior outstanding
    /// codes for that address.
    ///
    /// # Errors
    /// * `UnknownIdentity` - no account owns this email (the code-request
    ///   flows reveal existence on purpose)
    /// * `DatabaseError` - store operation failed
    pub async fn issue(&self, email: &str) -> Result<(User, String), AuthError> {
        let user = self
            .users
            .find_by_email(email)
            .await?
            .ok_or_else(|| AuthError::UnknownIdentity(email.to_string()))?;

        let code = generate_code();
        let expires_at = Utc::now() + Duration::minutes(self.ttl_minutes);

        self.codes.replace(email, &code, expires_at).await?;

        tracing::info!(email = %email, "One-time code issued");

        Ok((user, code))
    }

    /// Consume a code and resolve the identity it proves.
    ///
    /// Wrong code, already-consumed code, and expired code all report the
    /// same `InvalidOrExpiredCode` to avoid oracle leakage.
    pub async fn consume(&self, email: &str, code: &str) -> Result<User, AuthError> {
        let matched = self.codes.consume(email, code).await?;
        if !matched {
            return Err(AuthError::InvalidOrExpiredCode);
        }

        // The code row proves a user owned this email when it was issued;
        // a since-deleted account reports the same non-committal error.
        self.users
            .find_by_email(email)
            .await?
            .ok_or(AuthError::InvalidOrExpiredCode)
    }
}

/// Uniformly random 6-digit code, 100000-999999 inclusive.
fn generate_code() -> String {
    rand::thread_rng().gen_range(100_000..=999_999).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::auth::service::tests::sample_user;
    use crate::domain::auth::service::tests::MockCodes;
    use crate::domain::auth::service::tests::MockUsers;

    #[test]
    fn test_generated_codes_are_six_digits() {
        for _ in 0..200 {
            let code = generate_code();
            assert_eq!(code.len(), 6);
            let value: u32 = code.parse().unwrap();
            assert!((100_000..=999_999).contains(&value));
        }
    }

    #[tokio::test]
    async fn test_issue_unknown_email() {
        let mut users = MockUsers::new();
        users.expect_find_by_email().returning(|_| Ok(None));
        let mut codes = MockCodes::new();
        codes.expect_replace().times(0);

        let manager = OneTimeCodeManager::new(Arc::new(users), Arc::new(codes), 10);
        let result = manager.issue("ghost@example.com").await;
        assert!(matches!(result, Err(AuthError::UnknownIdentity(_))));
    }

    #[tokio::test]
    async fn test_issue_replaces_prior_codes() {
        let mut users = MockUsers::new();
        users
            .expect_find_by_email()
            .returning(|_| Ok(Some(sample_user())));
        let mut codes = MockCodes::new();
        codes
            .expect_replace()
            .withf(|email, code, expires_at| {
                email == "ana@example.com"
                    && code.len() == 6
                    && *expires_at > Utc::now() + Duration::minutes(9)
            })
            .times(1)
            .returning(|_, _, _| Ok(()));

        let manager = OneTimeCodeManager::new(Arc::new(users), Arc::new(codes), 10);
        let (user, code) = manager.issue("ana@example.com").await.unwrap();
        assert_eq!(user.email.as_str(), "ana@example.com");
        assert_eq!(code.len(), 6);
    }

    #[tokio::test]
    async fn test_consume_mismatch_is_uniform() {
        let users = MockUsers::new();
        let mut codes = MockCodes::new();
        codes.expect_consume().returning(|_, _| Ok(false));

        let manager = OneTimeCodeManager::new(Arc::new(users), Arc::new(codes), 10);
        let result = manager.consume("ana@example.com", "123456").await;
        assert!(matches!(result, Err(AuthError::InvalidOrExpiredCode)));
    }

    #[tokio::test]
    async fn test_consume_resolves_user() {
        let mut users = MockUsers::new();
        users
            .expect_find_by_email()
            .returning(|_| Ok(Some(sample_user())));
        let mut codes = MockCodes::new();
        codes
            .expect_consume()
            .withf(|email, code| email == "ana@example.com" && code == "654321")
            .times(1)
            .returning(|_, _| Ok(true));

        let manager = OneTimeCodeManager::new(Arc::new(users), Arc::new(codes), 10);
        let user = manager.consume("ana@example.com", "654321").await.unwrap();
        assert_eq!(user.username.as_str(), "ana");
    }
}
