use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{PasswordToken, User};
use crate::store::{Store, StoreError};

pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db) if db.is_unique_violation() => StoreError::Conflict,
            _ => StoreError::Backend(err.to_string()),
        }
    }
}

#[async_trait]
impl Store for PgStore {
    async fn save_token(&self, token: &PasswordToken) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO password_tokens (token, user_id, expires_at, created_at)
             VALUES ($1, $2, $3, $4)",
        )
        .bind(&token.token)
        .bind(token.user_id)
        .bind(token.expires_at)
        .bind(token.created_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn find_token(&self, token: &str) -> Result<Option<PasswordToken>, StoreError> {
        let found = sqlx::query_as::<_, PasswordToken>(
            "SELECT * FROM password_tokens WHERE token = $1",
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;
        Ok(found)
    }

    async fn find_token_for_user(
        &self,
        user_id: Uuid,
    ) -> Result<Option<PasswordToken>, StoreError> {
        let found = sqlx::query_as::<_, PasswordToken>(
            "SELECT * FROM password_tokens WHERE user_id = $1
             ORDER BY created_at DESC LIMIT 1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(found)
    }

    async fn delete_token(&self, token: &str) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM password_tokens WHERE token = $1")
            .bind(token)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn consume_token(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<PasswordToken>, StoreError> {
        // Conditional delete, so two concurrent consumers can't both win.
        let consumed = sqlx::query_as::<_, PasswordToken>(
            "DELETE FROM password_tokens WHERE token = $1 AND expires_at > $2 RETURNING *",
        )
        .bind(token)
        .bind(now)
        .fetch_optional(&self.pool)
        .await?;
        Ok(consumed)
    }

    async fn find_user_by(&self, field: &str, value: &str) -> Result<Option<User>, StoreError> {
        // Static SQL per whitelisted column; never interpolate the field name.
        let sql = match field {
            "email" => "SELECT * FROM users WHERE email = $1",
            "username" => "SELECT * FROM users WHERE username = $1",
            _ => {
                return Err(StoreError::Backend(format!(
                    "unknown lookup column: {field}"
                )));
            }
        };
        let found = sqlx::query_as::<_, User>(sql)
            .bind(value)
            .fetch_optional(&self.pool)
            .await?;
        Ok(found)
    }

    async fn update_credential(&self, user_id: Uuid, credential: &str) -> Result<(), StoreError> {
        sqlx::query("UPDATE users SET password = $2 WHERE id = $1")
            .bind(user_id)
            .bind(credential)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
