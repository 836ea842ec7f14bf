use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::auth::errors::AuthError;
use crate::domain::auth::ports::TokenBlacklistRepository;

pub struct PostgresTokenBlacklistRepository {
    pool: PgPool,
}

impl PostgresTokenBlacklistRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TokenBlacklistRepository for PostgresTokenBlacklistRepository {
    async fn insert(&self, token: &str) -> Result<(), AuthError> {
        // ON CONFLICT keeps logout idempotent.
        sqlx::query(
            r#"
            INSERT INTO token_blacklist (id, token, created_at)
            VALUES ($1, $2, now())
            ON CONFLICT (token) DO NOTHING
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(token)
        .execute(&self.pool)
        .await
        .map_err(|e| AuthError::DatabaseError(e.to_string()))?;

        Ok(())
    }

    async fn contains(&self, token: &str) -> Result<bool, AuthError> {
        let row = sqlx::query("SELECT 1 AS present FROM token_blacklist WHERE token = $1")
            .bind(token)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AuthError::DatabaseError(e.to_string()))?;

        Ok(row.is_some())
    }
}
