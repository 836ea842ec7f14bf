use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::auth::errors::AuthError;
use crate::domain::auth::ports::VerificationCodeRepository;

pub struct PostgresVerificationCodeRepository {
    pool: PgPool,
}

impl PostgresVerificationCodeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl VerificationCodeRepository for PostgresVerificationCodeRepository {
    async fn replace(
        &self,
        email: &str,
        code: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), AuthError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AuthError::DatabaseError(e.to_string()))?;

        // Only the newest code per email is ever live.
        sqlx::query("DELETE FROM verification_codes WHERE email = $1")
            .bind(email)
            .execute(&mut *tx)
            .await
            .map_err(|e| AuthError::DatabaseError(e.to_string()))?;

        sqlx::query(
            r#"
            INSERT INTO verification_codes (id, email, code, expires_at, used, created_at)
            VALUES ($1, $2, $3, $4, false, now())
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(email)
        .bind(code)
        .bind(expires_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| AuthError::DatabaseError(e.to_string()))?;

        tx.commit()
            .await
            .map_err(|e| AuthError::DatabaseError(e.to_string()))?;

        Ok(())
    }

    async fn consume(&self, email: &str, code: &str) -> Result<bool, AuthError> {
        // Conditional mark-used: a concurrent consume of the same code loses
        // because the row is no longer unused.
        let result = sqlx::query(
            r#"
            UPDATE verification_codes
            SET used = true
            WHERE id = (
                SELECT id FROM verification_codes
                WHERE email = $1 AND code = $2 AND used = false AND expires_at > now()
                ORDER BY created_at DESC
                LIMIT 1
            )
            "#,
        )
        .bind(email)
        .bind(code)
        .execute(&self.pool)
        .await
        .map_err(|e| AuthError::DatabaseError(e.to_string()))?;

        Ok(result.rows_affected() == 1)
    }
}
