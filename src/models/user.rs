use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Columns a reset request may look a user up by. Naming anything else in
/// `PWRESET_AUTHORIZED_FIELDS` is a deployment error caught at startup.
pub const LOOKUP_FIELDS: &[&str] = &["email", "username"];

#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub username: String,
    pub password: String,
    pub created_at: DateTime<Utc>,
}
