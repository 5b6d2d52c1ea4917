use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single-use, time-bounded proof of authorization to reset one user's
/// password. The token string itself is the primary key.
#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct PasswordToken {
    pub token: String,
    pub user_id: Uuid,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl PasswordToken {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}
