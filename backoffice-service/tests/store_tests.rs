//! Store-level checks for the one-time-code and password-reset tables. These
//! need a reachable Postgres, so they are ignored by default:
//!
//!   DATABASE_URL=postgres://... cargo test --test store_tests -- --ignored

use backoffice_service::auth_domain::ports::PasswordResetRepository;
use backoffice_service::auth_domain::ports::VerificationCodeRepository;
use backoffice_service::repositories::PostgresPasswordResetRepository;
use backoffice_service::repositories::PostgresVerificationCodeRepository;
use chrono::Duration;
use chrono::Utc;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use sqlx::Row;
use uuid::Uuid;

async fn connect() -> PgPool {
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for store tests");
    let pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(&url)
        .await
        .expect("Failed to connect to Postgres");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations");
    pool
}

fn unique_email(prefix: &str) -> String {
    format!("{prefix}-{}@example.com", Uuid::new_v4().simple())
}

#[tokio::test]
#[ignore]
async fn test_verification_code_is_single_use() {
    let pool = connect().await;
    let codes = PostgresVerificationCodeRepository::new(pool);
    let email = unique_email("code-once");

    codes
        .replace(&email, "123456", Utc::now() + Duration::minutes(10))
        .await
        .expect("Failed to store code");

    assert!(codes.consume(&email, "123456").await.unwrap());
    assert!(!codes.consume(&email, "123456").await.unwrap());
}

#[tokio::test]
#[ignore]
async fn test_expired_verification_code_is_rejected() {
    let pool = connect().await;
    let codes = PostgresVerificationCodeRepository::new(pool);
    let email = unique_email("code-expired");

    codes
        .replace(&email, "123456", Utc::now() - Duration::minutes(1))
        .await
        .expect("Failed to store code");

    assert!(!codes.consume(&email, "123456").await.unwrap());
}

#[tokio::test]
#[ignore]
async fn test_replace_invalidates_prior_code() {
    let pool = connect().await;
    let codes = PostgresVerificationCodeRepository::new(pool);
    let email = unique_email("code-replace");
    let expires_at = Utc::now() + Duration::minutes(10);

    codes.replace(&email, "111111", expires_at).await.unwrap();
    codes.replace(&email, "222222", expires_at).await.unwrap();

    assert!(!codes.consume(&email, "111111").await.unwrap());
    assert!(codes.consume(&email, "222222").await.unwrap());
}

#[tokio::test]
#[ignore]
async fn test_reset_token_consumes_once_and_rewrites_password() {
    let pool = connect().await;
    let resets = PostgresPasswordResetRepository::new(pool.clone());
    let email = unique_email("reset");
    let username = format!("reset-{}", Uuid::new_v4().simple());

    sqlx::query(
        "INSERT INTO users (id, username, email, password_hash, first_name) \
         VALUES ($1, $2, $3, 'old-hash', 'Ana')",
    )
    .bind(Uuid::new_v4())
    .bind(&username)
    .bind(&email)
    .execute(&pool)
    .await
    .expect("Failed to insert user");

    let token = format!("token-{}", Uuid::new_v4().simple());
    resets
        .replace(&email, &token, Utc::now() + Duration::hours(1))
        .await
        .expect("Failed to store token");

    let owner = resets
        .consume_and_update_password(&token, "new-hash")
        .await
        .expect("Consume failed");
    assert_eq!(owner.as_deref(), Some(email.as_str()));

    let row = sqlx::query("SELECT password_hash FROM users WHERE email = $1")
        .bind(&email)
        .fetch_one(&pool)
        .await
        .expect("Failed to read back user");
    assert_eq!(row.get::<Option<String>, _>("password_hash").as_deref(), Some("new-hash"));

    // Second spend of the same token finds nothing to consume.
    let replay = resets
        .consume_and_update_password(&token, "other-hash")
        .await
        .expect("Consume failed");
    assert_eq!(replay, None);
}
