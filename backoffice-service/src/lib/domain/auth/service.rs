use std::sync::Arc;

use auth::check_strength;
use auth::Authenticator;
use auth::SessionClaims;
use chrono::Utc;
use uuid::Uuid;

use crate::domain::auth::code_manager::OneTimeCodeManager;
use crate::domain::auth::errors::AuthError;
use crate::domain::auth::models::CodeChannel;
use crate::domain::auth::models::GoogleProfile;
use crate::domain::auth::models::RegisterUserCommand;
use crate::domain::auth::models::Session;
use crate::domain::auth::ports::GoogleTokenVerifier;
use crate::domain::auth::ports::MailSender;
use crate::domain::auth::ports::PasswordResetRepository;
use crate::domain::auth::ports::SmsSender;
use crate::domain::auth::ports::TokenBlacklistRepository;
use crate::domain::auth::ports::VerificationCodeRepository;
use crate::domain::auth::reset_manager::PasswordResetManager;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::Role;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::models::Username;
use crate::domain::user::ports::UserRepository;

/// Lifetimes for the credentials this service issues.
#[derive(Debug, Clone, Copy)]
pub struct AuthSettings {
    /// Session token lifetime. Canonical value: 24 hours.
    pub token_ttl_hours: i64,
    /// One-time code lifetime. Canonical value: 10 minutes.
    pub code_ttl_minutes: i64,
    /// Reset token lifetime. Canonical value: 60 minutes.
    pub reset_ttl_minutes: i64,
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            token_ttl_hours: 24,
            code_ttl_minutes: 10,
            reset_ttl_minutes: 60,
        }
    }
}

/// Authentication Orchestrator.
///
/// Composes the Secret Hasher, Token Issuer, One-Time-Code Manager, and
/// Password-Reset Manager into the four login paths plus registration,
/// logout, and the request-time authorization check used by the access guard.
pub struct AuthService<UR, CR, RR, BR>
where
    UR: UserRepository,
    CR: VerificationCodeRepository,
    RR: PasswordResetRepository,
    BR: TokenBlacklistRepository,
{
    users: Arc<UR>,
    codes: OneTimeCodeManager<UR, CR>,
    resets: PasswordResetManager<UR, RR>,
    blacklist: Arc<BR>,
    authenticator: Arc<Authenticator>,
    mailer: Arc<dyn MailSender>,
    sms: Arc<dyn SmsSender>,
    google: Arc<dyn GoogleTokenVerifier>,
    settings: AuthSettings,
}

impl<UR, CR, RR, BR> AuthService<UR, CR, RR, BR>
where
    UR: UserRepository,
    CR: VerificationCodeRepository,
    RR: PasswordResetRepository,
    BR: TokenBlacklistRepository,
{
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        users: Arc<UR>,
        codes: Arc<CR>,
        resets: Arc<RR>,
        blacklist: Arc<BR>,
        authenticator: Arc<Authenticator>,
        mailer: Arc<dyn MailSender>,
        sms: Arc<dyn SmsSender>,
        google: Arc<dyn GoogleTokenVerifier>,
        settings: AuthSettings,
    ) -> Self {
        Self {
            codes: OneTimeCodeManager::new(
                Arc::clone(&users),
                codes,
                settings.code_ttl_minutes,
            ),
            resets: PasswordResetManager::new(
                Arc::clone(&users),
                resets,
                settings.reset_ttl_minutes,
            ),
            users,
            blacklist,
            authenticator,
            mailer,
            sms,
            google,
            settings,
        }
    }

    /// Register a new account with the customer role.
    ///
    /// # Errors
    /// * `WeakPassword` - strength policy violation
    /// * `User(UsernameAlreadyExists | EmailAlreadyExists)` - uniqueness
    ///   conflict; no row is inserted
    pub async fn register(&self, command: RegisterUserCommand) -> Result<User, AuthError> {
        check_strength(&command.password)?;

        let password_hash = self.authenticator.hash_password(&command.password)?;

        let now = Utc::now();
        let user = User {
            id: UserId::new(),
            username: command.username,
            email: command.email,
            password_hash: Some(password_hash),
            first_name: command.first_name,
            last_name: command.last_name,
            mother_lastname: command.mother_lastname,
            phone: command.phone,
            birthdate: command.birthdate,
            google_id: None,
            profile_picture: None,
            role: Role::Customer,
            status: "active".to_string(),
            created_at: now,
            updated_at: now,
        };

        let created = self.users.create(user).await?;

        tracing::info!(username = %created.username, "User registered");

        Ok(created)
    }

    /// Flow A: password login.
    ///
    /// `identifier` matches username or email, case-sensitive. Unknown user,
    /// passwordless account, and wrong password all answer the same
    /// `InvalidCredentials` so responses never reveal which part failed.
    pub async fn login(&self, identifier: &str, password: &str) -> Result<Session, AuthError> {
        let user = self
            .users
            .find_by_identifier(identifier)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        let stored_hash = user
            .password_hash
            .as_deref()
            .ok_or(AuthError::InvalidCredentials)?;

        let claims = self.claims_for(&user);
        let token = self
            .authenticator
            .authenticate(password, stored_hash, &claims)
            .map_err(|e| match e {
                auth::AuthenticationError::InvalidCredentials => AuthError::InvalidCredentials,
                auth::AuthenticationError::PasswordError(err) => AuthError::Password(err),
                auth::AuthenticationError::JwtError(err) => AuthError::from(err),
            })?;

        tracing::info!(username = %user.username, "Password login succeeded");

        Ok(Session { token, user })
    }

    /// Flow B: federated (Google) login.
    ///
    /// Creates the account on first sight, with a hashed random placeholder
    /// password so the row authenticates only federatively. An existing
    /// account found by email gets its `google_id` backfilled first-write-
    /// wins.
    pub async fn login_with_google(&self, credential: &str) -> Result<Session, AuthError> {
        let profile = self.google.verify(credential).await?;

        let existing = match self.users.find_by_google_id(&profile.google_id).await? {
            Some(user) => Some(user),
            None => self.users.find_by_email(&profile.email).await?,
        };

        let user = match existing {
            Some(user) => {
                if user.google_id.is_none() {
                    self.users
                        .link_google_account(
                            &user.id,
                            &profile.google_id,
                            profile.picture.clone(),
                        )
                        .await?;
                }
                tracing::info!(username = %user.username, "Google login for existing account");
                user
            }
            None => {
                let user = self.create_federated_user(&profile).await?;
                tracing::info!(username = %user.username, "Account created via Google login");
                user
            }
        };

        self.issue_session(user)
    }

    async fn create_federated_user(&self, profile: &GoogleProfile) -> Result<User, AuthError> {
        let email = EmailAddress::new(profile.email.clone())
            .map_err(crate::domain::user::errors::UserError::from)?;
        let username = derive_username(&email)?;

        // Placeholder secret keeps the NOT NULL invariant; nobody knows the
        // plaintext, so it never authenticates.
        let placeholder = Uuid::new_v4().simple().to_string();
        let password_hash = self.authenticator.hash_password(&placeholder)?;

        let now = Utc::now();
        let user = User {
            id: UserId::new(),
            first_name: profile
                .given_name
                .clone()
                .unwrap_or_else(|| email.local_part().to_string()),
            last_name: profile.family_name.clone(),
            mother_lastname: None,
            username,
            email,
            password_hash: Some(password_hash),
            phone: None,
            birthdate: None,
            google_id: Some(profile.google_id.clone()),
            profile_picture: profile.picture.clone(),
            role: Role::Customer,
            status: "active".to_string(),
            created_at: now,
            updated_at: now,
        };

        Ok(self.users.create(user).await?)
    }

    /// Flow C, step 1: issue a one-time code and deliver it over `channel`.
    ///
    /// A failed send does not roll the code back; the user can retry the
    /// request and get a fresh code.
    pub async fn request_code(&self, email: &str, channel: CodeChannel) -> Result<(), AuthError> {
        let (user, code) = self.codes.issue(email).await?;

        match channel {
            CodeChannel::Email => {
                self.mailer.send_verification_code(email, &code).await?;
            }
            CodeChannel::Sms => {
                let phone = user.phone.as_deref().ok_or(AuthError::MissingPhoneNumber)?;
                let body = format!("Your login code is {code}. It expires in 10 minutes.");
                self.sms.send(phone, &body).await?;
            }
        }

        Ok(())
    }

    /// Flow C, step 2: consume the code and open a session.
    pub async fn verify_code(&self, email: &str, code: &str) -> Result<Session, AuthError> {
        let user = self.codes.consume(email, code).await?;
        self.issue_session(user)
    }

    /// Flow D, step 1: issue a reset token and mail the link.
    ///
    /// Success-shaped for unknown emails; only the mail send can surface an
    /// error, and only for accounts that exist.
    pub async fn forgot_password(&self, email: &str) -> Result<(), AuthError> {
        if let Some(token) = self.resets.issue(email).await? {
            self.mailer.send_password_reset(email, &token).await?;
        }
        Ok(())
    }

    /// Flow D, step 2: consume the token and set the new password.
    pub async fn reset_password(&self, token: &str, new_password: &str) -> Result<(), AuthError> {
        self.resets.consume(token, new_password).await
    }

    /// Revoke a session token. Idempotent; re-revoking is not an error.
    pub async fn logout(&self, token: &str) -> Result<(), AuthError> {
        self.blacklist.insert(token).await?;
        tracing::info!("Session revoked");
        Ok(())
    }

    /// Request-time authorization: revocation check, then signature and
    /// expiry validation. Pure read sequence, no mutation.
    ///
    /// # Errors
    /// * `TokenRevoked` - token was blacklisted on logout
    /// * `TokenExpired` - past its expiry
    /// * `TokenInvalid` - bad signature or structure
    pub async fn authorize(&self, token: &str) -> Result<SessionClaims, AuthError> {
        if self.blacklist.contains(token).await? {
            return Err(AuthError::TokenRevoked);
        }

        Ok(self.authenticator.validate_token(token)?)
    }

    /// Fresh user record for the protected `/verify` echo.
    pub async fn current_user(&self, id: &UserId) -> Result<User, AuthError> {
        self.users
            .find_by_id(id)
            .await?
            .ok_or_else(|| crate::domain::user::errors::UserError::NotFound(id.to_string()).into())
    }

    fn claims_for(&self, user: &User) -> SessionClaims {
        SessionClaims::new(
            user.id,
            user.role.as_str(),
            user.username.as_str(),
            self.settings.token_ttl_hours,
        )
    }

    fn issue_session(&self, user: User) -> Result<Session, AuthError> {
        let claims = self.claims_for(&user);
        let token = self.authenticator.issue_token(&claims)?;
        Ok(Session { token, user })
    }
}

/// Derive a username from the email local part, as federated sign-up has no
/// username of its own. Falls back to a generated handle when the local part
/// does not satisfy the username rules.
fn derive_username(
    email: &EmailAddress,
) -> Result<Username, crate::domain::user::errors::UserError> {
    match Username::new(email.local_part().to_string()) {
        Ok(username) => Ok(username),
        Err(_) => {
            let fallback = format!("user-{}", &Uuid::new_v4().simple().to_string()[..8]);
            Ok(Username::new(fallback)?)
        }
    }
}

#[cfg(test)]
pub mod tests {
    use async_trait::async_trait;
    use chrono::DateTime;
    use mockall::mock;

    use super::*;
    use crate::domain::user::errors::UserError;
    use crate::domain::user::models::UpdateUserCommand;
    use crate::domain::user::models::UserFilter;
    use crate::domain::user::models::UserStats;

    mock! {
        pub Users {}

        #[async_trait]
        impl UserRepository for Users {
            async fn create(&self, user: User) -> Result<User, UserError>;
            async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError>;
            async fn find_by_identifier(&self, identifier: &str) -> Result<Option<User>, UserError>;
            async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserError>;
            async fn find_by_google_id(&self, google_id: &str) -> Result<Option<User>, UserError>;
            async fn link_google_account(
                &self,
                id: &UserId,
                google_id: &str,
                profile_picture: Option<String>,
            ) -> Result<(), UserError>;
            async fn list(&self, filter: &UserFilter) -> Result<Vec<User>, UserError>;
            async fn update(&self, id: &UserId, command: UpdateUserCommand) -> Result<User, UserError>;
            async fn delete(&self, id: &UserId) -> Result<(), UserError>;
            async fn stats(&self) -> Result<UserStats, UserError>;
        }
    }

    mock! {
        pub Codes {}

        #[async_trait]
        impl VerificationCodeRepository for Codes {
            async fn replace(
                &self,
                email: &str,
                code: &str,
                expires_at: DateTime<Utc>,
            ) -> Result<(), AuthError>;
            async fn consume(&self, email: &str, code: &str) -> Result<bool, AuthError>;
        }
    }

    mock! {
        pub Resets {}

        #[async_trait]
        impl PasswordResetRepository for Resets {
            async fn replace(
                &self,
                email: &str,
                token: &str,
                expires_at: DateTime<Utc>,
            ) -> Result<(), AuthError>;
            async fn consume_and_update_password(
                &self,
                token: &str,
                new_password_hash: &str,
            ) -> Result<Option<String>, AuthError>;
        }
    }

    mock! {
        pub Blacklist {}

        #[async_trait]
        impl TokenBlacklistRepository for Blacklist {
            async fn insert(&self, token: &str) -> Result<(), AuthError>;
            async fn contains(&self, token: &str) -> Result<bool, AuthError>;
        }
    }

    mock! {
        pub Mailer {}

        #[async_trait]
        impl MailSender for Mailer {
            async fn send_verification_code(&self, to: &str, code: &str) -> Result<(), AuthError>;
            async fn send_password_reset(&self, to: &str, token: &str) -> Result<(), AuthError>;
        }
    }

    mock! {
        pub Sms {}

        #[async_trait]
        impl SmsSender for Sms {
            async fn send(&self, to: &str, body: &str) -> Result<(), AuthError>;
        }
    }

    mock! {
        pub Google {}

        #[async_trait]
        impl GoogleTokenVerifier for Google {
            async fn verify(&self, credential: &str) -> Result<GoogleProfile, AuthError>;
        }
    }

    pub fn sample_user() -> User {
        let now = Utc::now();
        User {
            id: UserId::new(),
            username: Username::new("ana".to_string()).unwrap(),
            email: EmailAddress::new("ana@example.com".to_string()).unwrap(),
            password_hash: Some("$argon2id$test_hash".to_string()),
            first_name: "Ana".to_string(),
            last_name: Some("Lopez".to_string()),
            mother_lastname: None,
            phone: Some("+5215512345678".to_string()),
            birthdate: None,
            google_id: None,
            profile_picture: None,
            role: Role::Customer,
            status: "active".to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn sample_profile() -> GoogleProfile {
        GoogleProfile {
            google_id: "google-sub-123".to_string(),
            email: "ana@example.com".to_string(),
            given_name: Some("Ana".to_string()),
            family_name: Some("Lopez".to_string()),
            picture: Some("https://example.com/ana.png".to_string()),
        }
    }

    struct ServiceBuilder {
        users: MockUsers,
        codes: MockCodes,
        resets: MockResets,
        blacklist: MockBlacklist,
        mailer: MockMailer,
        sms: MockSms,
        google: MockGoogle,
    }

    impl ServiceBuilder {
        fn new() -> Self {
            Self {
                users: MockUsers::new(),
                codes: MockCodes::new(),
                resets: MockResets::new(),
                blacklist: MockBlacklist::new(),
                mailer: MockMailer::new(),
                sms: MockSms::new(),
                google: MockGoogle::new(),
            }
        }

        fn build(self) -> AuthService<MockUsers, MockCodes, MockResets, MockBlacklist> {
            AuthService::new(
                Arc::new(self.users),
                Arc::new(self.codes),
                Arc::new(self.resets),
                Arc::new(self.blacklist),
                Arc::new(Authenticator::new(b"test-secret-key-at-least-32-bytes!!")),
                Arc::new(self.mailer),
                Arc::new(self.sms),
                Arc::new(self.google),
                AuthSettings::default(),
            )
        }
    }

    fn register_command() -> RegisterUserCommand {
        RegisterUserCommand {
            username: Username::new("ana".to_string()).unwrap(),
            email: EmailAddress::new("ana@example.com".to_string()).unwrap(),
            password: "Abcdef1!".to_string(),
            first_name: "Ana".to_string(),
            last_name: Some("Lopez".to_string()),
            mother_lastname: None,
            phone: None,
            birthdate: None,
        }
    }

    #[tokio::test]
    async fn test_register_hashes_and_defaults_to_customer() {
        let mut builder = ServiceBuilder::new();
        builder
            .users
            .expect_create()
            .withf(|user| {
                user.role == Role::Customer
                    && user
                        .password_hash
                        .as_deref()
                        .is_some_and(|h| h.starts_with("$argon2"))
            })
            .times(1)
            .returning(Ok);

        let service = builder.build();
        let user = service.register(register_command()).await.unwrap();
        assert_eq!(user.username.as_str(), "ana");
    }

    #[tokio::test]
    async fn test_register_rejects_weak_password() {
        let mut builder = ServiceBuilder::new();
        builder.users.expect_create().times(0);

        let service = builder.build();
        let mut command = register_command();
        command.password = "abc".to_string();

        let result = service.register(command).await;
        assert!(matches!(result, Err(AuthError::WeakPassword(_))));
    }

    #[tokio::test]
    async fn test_register_duplicate_never_partially_inserts() {
        let mut builder = ServiceBuilder::new();
        builder
            .users
            .expect_create()
            .times(1)
            .returning(|user| Err(UserError::EmailAlreadyExists(user.email.to_string())));

        let service = builder.build();
        let result = service.register(register_command()).await;
        assert!(matches!(
            result,
            Err(AuthError::User(UserError::EmailAlreadyExists(_)))
        ));
    }

    #[tokio::test]
    async fn test_login_success_issues_valid_session() {
        let authenticator = Authenticator::new(b"test-secret-key-at-least-32-bytes!!");
        let hash = authenticator.hash_password("Abcdef1!").unwrap();

        let mut builder = ServiceBuilder::new();
        let mut user = sample_user();
        user.password_hash = Some(hash);
        let user_id = user.id;
        builder
            .users
            .expect_find_by_identifier()
            .withf(|identifier| identifier == "ana")
            .times(1)
            .returning(move |_| Ok(Some(user.clone())));

        let service = builder.build();
        let session = service.login("ana", "Abcdef1!").await.unwrap();

        let claims = Authenticator::new(b"test-secret-key-at-least-32-bytes!!")
            .validate_token(&session.token)
            .unwrap();
        assert_eq!(claims.sub, user_id.to_string());
        assert_eq!(claims.role, "customer");
        assert_eq!(claims.username, "ana");
    }

    #[tokio::test]
    async fn test_login_unknown_and_wrong_password_are_indistinguishable() {
        // Unknown user
        let mut builder = ServiceBuilder::new();
        builder
            .users
            .expect_find_by_identifier()
            .returning(|_| Ok(None));
        let unknown = builder.build().login("ghost", "Abcdef1!").await;

        // Known user, wrong password
        let authenticator = Authenticator::new(b"test-secret-key-at-least-32-bytes!!");
        let hash = authenticator.hash_password("Abcdef1!").unwrap();
        let mut builder = ServiceBuilder::new();
        let mut user = sample_user();
        user.password_hash = Some(hash);
        builder
            .users
            .expect_find_by_identifier()
            .returning(move |_| Ok(Some(user.clone())));
        let wrong = builder.build().login("ana", "Wrong-pass9").await;

        let unknown_err = unknown.unwrap_err().to_string();
        let wrong_err = wrong.unwrap_err().to_string();
        assert_eq!(unknown_err, wrong_err);
    }

    #[tokio::test]
    async fn test_login_passwordless_account_unifies_to_invalid_credentials() {
        let mut builder = ServiceBuilder::new();
        let mut user = sample_user();
        user.password_hash = None;
        builder
            .users
            .expect_find_by_identifier()
            .returning(move |_| Ok(Some(user.clone())));

        let result = builder.build().login("ana", "Abcdef1!").await;
        assert!(matches!(result, Err(AuthError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_google_first_login_creates_customer_with_placeholder_hash() {
        let mut builder = ServiceBuilder::new();
        builder
            .google
            .expect_verify()
            .times(1)
            .returning(|_| Ok(sample_profile()));
        builder
            .users
            .expect_find_by_google_id()
            .returning(|_| Ok(None));
        builder.users.expect_find_by_email().returning(|_| Ok(None));
        builder
            .users
            .expect_create()
            .withf(|user| {
                user.role == Role::Customer
                    && user.google_id.as_deref() == Some("google-sub-123")
                    && user.username.as_str() == "ana"
                    && user
                        .password_hash
                        .as_deref()
                        .is_some_and(|h| h.starts_with("$argon2"))
            })
            .times(1)
            .returning(Ok);

        let service = builder.build();
        let session = service.login_with_google("id-token").await.unwrap();
        assert_eq!(session.user.email.as_str(), "ana@example.com");
    }

    #[tokio::test]
    async fn test_google_second_login_reuses_row() {
        let mut builder = ServiceBuilder::new();
        builder
            .google
            .expect_verify()
            .returning(|_| Ok(sample_profile()));
        let mut user = sample_user();
        user.google_id = Some("google-sub-123".to_string());
        builder
            .users
            .expect_find_by_google_id()
            .times(1)
            .returning(move |_| Ok(Some(user.clone())));
        builder.users.expect_create().times(0);
        builder.users.expect_link_google_account().times(0);

        let service = builder.build();
        let session = service.login_with_google("id-token").await.unwrap();
        assert_eq!(session.user.username.as_str(), "ana");
    }

    #[tokio::test]
    async fn test_google_backfills_link_on_email_match() {
        let mut builder = ServiceBuilder::new();
        builder
            .google
            .expect_verify()
            .returning(|_| Ok(sample_profile()));
        builder
            .users
            .expect_find_by_google_id()
            .returning(|_| Ok(None));
        let user = sample_user();
        let user_id = user.id;
        builder
            .users
            .expect_find_by_email()
            .returning(move |_| Ok(Some(user.clone())));
        builder
            .users
            .expect_link_google_account()
            .withf(move |id, google_id, picture| {
                *id == user_id
                    && google_id == "google-sub-123"
                    && picture.as_deref() == Some("https://example.com/ana.png")
            })
            .times(1)
            .returning(|_, _, _| Ok(()));

        builder.build().login_with_google("id-token").await.unwrap();
    }

    #[tokio::test]
    async fn test_request_code_email_channel_sends_mail() {
        let mut builder = ServiceBuilder::new();
        builder
            .users
            .expect_find_by_email()
            .returning(|_| Ok(Some(sample_user())));
        builder
            .codes
            .expect_replace()
            .times(1)
            .returning(|_, _, _| Ok(()));
        builder
            .mailer
            .expect_send_verification_code()
            .withf(|to, code| to == "ana@example.com" && code.len() == 6)
            .times(1)
            .returning(|_, _| Ok(()));

        builder
            .build()
            .request_code("ana@example.com", CodeChannel::Email)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_request_code_send_failure_reported_after_issuance() {
        let mut builder = ServiceBuilder::new();
        builder
            .users
            .expect_find_by_email()
            .returning(|_| Ok(Some(sample_user())));
        // Issuance happens and is not rolled back even though the send fails.
        builder
            .codes
            .expect_replace()
            .times(1)
            .returning(|_, _, _| Ok(()));
        builder
            .mailer
            .expect_send_verification_code()
            .returning(|_, _| Err(AuthError::SendFailed("smtp down".to_string())));

        let result = builder
            .build()
            .request_code("ana@example.com", CodeChannel::Email)
            .await;
        assert!(matches!(result, Err(AuthError::SendFailed(_))));
    }

    #[tokio::test]
    async fn test_request_code_sms_without_phone() {
        let mut builder = ServiceBuilder::new();
        let mut user = sample_user();
        user.phone = None;
        builder
            .users
            .expect_find_by_email()
            .returning(move |_| Ok(Some(user.clone())));
        builder
            .codes
            .expect_replace()
            .returning(|_, _, _| Ok(()));
        builder.sms.expect_send().times(0);

        let result = builder
            .build()
            .request_code("ana@example.com", CodeChannel::Sms)
            .await;
        assert!(matches!(result, Err(AuthError::MissingPhoneNumber)));
    }

    #[tokio::test]
    async fn test_verify_code_opens_session() {
        let mut builder = ServiceBuilder::new();
        builder
            .codes
            .expect_consume()
            .times(1)
            .returning(|_, _| Ok(true));
        builder
            .users
            .expect_find_by_email()
            .returning(|_| Ok(Some(sample_user())));

        let session = builder
            .build()
            .verify_code("ana@example.com", "123456")
            .await
            .unwrap();
        assert!(!session.token.is_empty());
    }

    #[tokio::test]
    async fn test_forgot_password_unknown_email_sends_nothing() {
        let mut builder = ServiceBuilder::new();
        builder.users.expect_find_by_email().returning(|_| Ok(None));
        builder.mailer.expect_send_password_reset().times(0);

        builder
            .build()
            .forgot_password("ghost@example.com")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_forgot_password_mails_token() {
        let mut builder = ServiceBuilder::new();
        builder
            .users
            .expect_find_by_email()
            .returning(|_| Ok(Some(sample_user())));
        builder
            .resets
            .expect_replace()
            .times(1)
            .returning(|_, _, _| Ok(()));
        builder
            .mailer
            .expect_send_password_reset()
            .withf(|to, token| to == "ana@example.com" && token.len() == 64)
            .times(1)
            .returning(|_, _| Ok(()));

        builder
            .build()
            .forgot_password("ana@example.com")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_logout_then_authorize_reports_revoked() {
        let authenticator = Authenticator::new(b"test-secret-key-at-least-32-bytes!!");
        let claims = SessionClaims::new("user123", "customer", "ana", 24);
        let token = authenticator.issue_token(&claims).unwrap();

        let mut builder = ServiceBuilder::new();
        let revoked = token.clone();
        builder
            .blacklist
            .expect_insert()
            .times(1)
            .returning(|_| Ok(()));
        builder
            .blacklist
            .expect_contains()
            .withf(move |t| t == revoked)
            .returning(|_| Ok(true));

        let service = builder.build();
        service.logout(&token).await.unwrap();

        let result = service.authorize(&token).await;
        assert!(matches!(result, Err(AuthError::TokenRevoked)));
    }

    #[tokio::test]
    async fn test_authorize_distinguishes_expired_from_invalid() {
        let authenticator = Authenticator::new(b"test-secret-key-at-least-32-bytes!!");
        let expired_claims = SessionClaims::with_ttl_seconds("user123", "customer", "ana", -2);
        let expired_token = authenticator.issue_token(&expired_claims).unwrap();

        let mut builder = ServiceBuilder::new();
        builder.blacklist.expect_contains().returning(|_| Ok(false));
        let service = builder.build();

        let expired = service.authorize(&expired_token).await;
        assert!(matches!(expired, Err(AuthError::TokenExpired)));

        let garbage = service.authorize("not.a.token").await;
        assert!(matches!(garbage, Err(AuthError::TokenInvalid)));
    }

    #[tokio::test]
    async fn test_authorize_valid_token_returns_claims() {
        let authenticator = Authenticator::new(b"test-secret-key-at-least-32-bytes!!");
        let claims = SessionClaims::new("user123", "admin", "root", 24);
        let token = authenticator.issue_token(&claims).unwrap();

        let mut builder = ServiceBuilder::new();
        builder.blacklist.expect_contains().returning(|_| Ok(false));

        let decoded = builder.build().authorize(&token).await.unwrap();
        assert_eq!(decoded.sub, "user123");
        assert_eq!(decoded.role, "admin");
    }
}
