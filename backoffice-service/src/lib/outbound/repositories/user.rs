use async_trait::async_trait;
use chrono::DateTime;
use chrono::NaiveDate;
use chrono::Utc;
use sqlx::PgPool;
use sqlx::QueryBuilder;
use sqlx::Row;
use uuid::Uuid;

use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::Role;
use crate::domain::user::models::UpdateUserCommand;
use crate::domain::user::models::User;
use crate::domain::user::models::UserFilter;
use crate::domain::user::models::UserId;
use crate::domain::user::models::UserStats;
use crate::domain::user::models::Username;
use crate::domain::user::ports::UserRepository;
use crate::user::errors::UserError;

const USER_COLUMNS: &str = "id, username, email, password_hash, first_name, last_name, \
     mother_lastname, phone, birthdate, google_id, profile_picture, role, status, \
     created_at, updated_at";

pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    username: String,
    email: String,
    password_hash: Option<String>,
    first_name: String,
    last_name: Option<String>,
    mother_lastname: Option<String>,
    phone: Option<String>,
    birthdate: Option<NaiveDate>,
    google_id: Option<String>,
    profile_picture: Option<String>,
    role: String,
    status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl UserRow {
    fn into_user(self) -> Result<User, UserError> {
        Ok(User {
            id: UserId(self.id),
            username: Username::new(self.username)?,
            email: EmailAddress::new(self.email)?,
            password_hash: self.password_hash,
            first_name: self.first_name,
            last_name: self.last_name,
            mother_lastname: self.mother_lastname,
            phone: self.phone,
            birthdate: self.birthdate,
            google_id: self.google_id,
            profile_picture: self.profile_picture,
            role: self.role.parse::<Role>()?,
            status: self.status,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

fn map_unique_violation(e: sqlx::Error, username: &str, email: &str) -> UserError {
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_unique_violation() {
            if db_err.constraint() == Some("users_username_key") {
                return UserError::UsernameAlreadyExists(username.to_string());
            }
            if db_err.constraint() == Some("users_email_key") {
                return UserError::EmailAlreadyExists(email.to_string());
            }
        }
    }
    UserError::DatabaseError(e.to_string())
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn create(&self, user: User) -> Result<User, UserError> {
        sqlx::query(
            r#"
            INSERT INTO users (
                id, username, email, password_hash, first_name, last_name,
                mother_lastname, phone, birthdate, google_id, profile_picture,
                role, status, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
            "#,
        )
        .bind(user.id.0)
        .bind(user.username.as_str())
        .bind(user.email.as_str())
        .bind(&user.password_hash)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.mother_lastname)
        .bind(&user.phone)
        .bind(user.birthdate)
        .bind(&user.google_id)
        .bind(&user.profile_picture)
        .bind(user.role.as_str())
        .bind(&user.status)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, user.username.as_str(), user.email.as_str()))?;

        Ok(user)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| UserError::DatabaseError(e.to_string()))?;

        row.map(UserRow::into_user).transpose()
    }

    async fn find_by_identifier(&self, identifier: &str) -> Result<Option<User>, UserError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE username = $1 OR email = $1"
        ))
        .bind(identifier)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| UserError::DatabaseError(e.to_string()))?;

        row.map(UserRow::into_user).transpose()
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| UserError::DatabaseError(e.to_string()))?;

        row.map(UserRow::into_user).transpose()
    }

    async fn find_by_google_id(&self, google_id: &str) -> Result<Option<User>, UserError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE google_id = $1"
        ))
        .bind(google_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| UserError::DatabaseError(e.to_string()))?;

        row.map(UserRow::into_user).transpose()
    }

    async fn link_google_account(
        &self,
        id: &UserId,
        google_id: &str,
        profile_picture: Option<String>,
    ) -> Result<(), UserError> {
        // Conditional on google_id IS NULL: a concurrent link wins and this
        // write becomes a no-op.
        sqlx::query(
            r#"
            UPDATE users
            SET google_id = $2,
                profile_picture = COALESCE(profile_picture, $3),
                updated_at = now()
            WHERE id = $1 AND google_id IS NULL
            "#,
        )
        .bind(id.0)
        .bind(google_id)
        .bind(profile_picture)
        .execute(&self.pool)
        .await
        .map_err(|e| UserError::DatabaseError(e.to_string()))?;

        Ok(())
    }

    async fn list(&self, filter: &UserFilter) -> Result<Vec<User>, UserError> {
        let mut builder = QueryBuilder::new(format!(
            "SELECT {USER_COLUMNS} FROM users WHERE 1 = 1"
        ));

        if let Some(search) = &filter.search {
            let pattern = format!("%{search}%");
            builder.push(" AND (first_name ILIKE ");
            builder.push_bind(pattern.clone());
            builder.push(" OR last_name ILIKE ");
            builder.push_bind(pattern.clone());
            builder.push(" OR email ILIKE ");
            builder.push_bind(pattern);
            builder.push(")");
        }

        if let Some(role) = filter.role {
            builder.push(" AND role = ");
            builder.push_bind(role.as_str());
        }

        builder.push(" ORDER BY created_at DESC");

        let rows = builder
            .build_query_as::<UserRow>()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| UserError::DatabaseError(e.to_string()))?;

        rows.into_iter().map(UserRow::into_user).collect()
    }

    async fn update(&self, id: &UserId, command: UpdateUserCommand) -> Result<User, UserError> {
        let email = command.email.as_ref().map(|e| e.as_str().to_string());

        let row = sqlx::query_as::<_, UserRow>(&format!(
            r#"
            UPDATE users
            SET first_name = COALESCE($2, first_name),
                last_name = COALESCE($3, last_name),
                mother_lastname = COALESCE($4, mother_lastname),
                email = COALESCE($5, email),
                phone = COALESCE($6, phone),
                role = COALESCE($7, role),
                updated_at = now()
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(id.0)
        .bind(&command.first_name)
        .bind(&command.last_name)
        .bind(&command.mother_lastname)
        .bind(&email)
        .bind(&command.phone)
        .bind(command.role.map(|r| r.as_str()))
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, "", email.as_deref().unwrap_or_default()))?;

        match row {
            Some(r) => r.into_user(),
            None => Err(UserError::NotFound(id.to_string())),
        }
    }

    async fn delete(&self, id: &UserId) -> Result<(), UserError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id.0)
            .execute(&self.pool)
            .await
            .map_err(|e| UserError::DatabaseError(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(UserError::NotFound(id.to_string()));
        }

        Ok(())
    }

    async fn stats(&self) -> Result<UserStats, UserError> {
        let totals = sqlx::query(
            r#"
            SELECT
                COUNT(*) AS total,
                COUNT(*) FILTER (WHERE created_at >= date_trunc('day', now())) AS new_today,
                COUNT(*) FILTER (WHERE created_at >= now() - interval '7 days') AS new_this_week,
                COUNT(*) FILTER (WHERE created_at >= date_trunc('month', now())) AS new_this_month
            FROM users
            "#,
        )
        .fetch_one(&self.pool)
        .await
        .map_err(|e| UserError::DatabaseError(e.to_string()))?;

        let by_role = sqlx::query(
            r#"
            SELECT role, COUNT(*) AS count
            FROM users
            GROUP BY role
            ORDER BY count DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| UserError::DatabaseError(e.to_string()))?;

        Ok(UserStats {
            total: totals.get("total"),
            new_today: totals.get("new_today"),
            new_this_week: totals.get("new_this_week"),
            new_this_month: totals.get("new_this_month"),
            by_role: by_role
                .into_iter()
                .map(|row| (row.get("role"), row.get("count")))
                .collect(),
        })
    }
}
