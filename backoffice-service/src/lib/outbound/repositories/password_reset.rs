use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use sqlx::PgPool;
use sqlx::Row;
use uuid::Uuid;

use crate::domain::auth::errors::AuthError;
use crate::domain::auth::ports::PasswordResetRepository;

pub struct PostgresPasswordResetRepository {
    pool: PgPool,
}

impl PostgresPasswordResetRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PasswordResetRepository for PostgresPasswordResetRepository {
    async fn replace(
        &self,
        email: &str,
        token: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), AuthError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AuthError::DatabaseError(e.to_string()))?;

        sqlx::query("DELETE FROM password_reset_tokens WHERE email = $1")
            .bind(email)
            .execute(&mut *tx)
            .await
            .map_err(|e| AuthError::DatabaseError(e.to_string()))?;

        sqlx::query(
            r#"
            INSERT INTO password_reset_tokens (id, email, token, expires_at, used, created_at)
            VALUES ($1, $2, $3, $4, false, now())
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(email)
        .bind(token)
        .bind(expires_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| AuthError::DatabaseError(e.to_string()))?;

        tx.commit()
            .await
            .map_err(|e| AuthError::DatabaseError(e.to_string()))?;

        Ok(())
    }

    async fn consume_and_update_password(
        &self,
        token: &str,
        new_password_hash: &str,
    ) -> Result<Option<String>, AuthError> {
        // One transaction for both writes: the token is burned and the hash
        // updated together, or neither happens.
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AuthError::DatabaseError(e.to_string()))?;

        let row = sqlx::query(
            r#"
            UPDATE password_reset_tokens
            SET used = true
            WHERE token = $1 AND used = false AND expires_at > now()
            RETURNING email
            "#,
        )
        .bind(token)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| AuthError::DatabaseError(e.to_string()))?;

        let Some(row) = row else {
            tx.rollback()
                .await
                .map_err(|e| AuthError::DatabaseError(e.to_string()))?;
            return Ok(None);
        };

        let email: String = row.get("email");

        sqlx::query(
            r#"
            UPDATE users
            SET password_hash = $2, updated_at = now()
            WHERE email = $1
            "#,
        )
        .bind(&email)
        .bind(new_password_hash)
        .execute(&mut *tx)
        .await
        .map_err(|e| AuthError::DatabaseError(e.to_string()))?;

        tx.commit()
            .await
            .map_err(|e| AuthError::DatabaseError(e.to_string()))?;

        Ok(Some(email))
    }
}
