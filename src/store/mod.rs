pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::models::{PasswordToken, User};

#[derive(Debug)]
pub enum StoreError {
    /// The token string already exists. The manager regenerates on this.
    Conflict,
    Backend(String),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::Conflict => write!(f, "token already exists"),
            StoreError::Backend(msg) => write!(f, "store error: {msg}"),
        }
    }
}

/// Persistence seam for the token manager and reset service. Production uses
/// [`postgres::PgStore`]; tests and SMTP-less development use
/// [`memory::MemoryStore`].
#[async_trait]
pub trait Store: Send + Sync {
    async fn save_token(&self, token: &PasswordToken) -> Result<(), StoreError>;

    /// Exact-match lookup. Does not filter on expiry; callers check.
    async fn find_token(&self, token: &str) -> Result<Option<PasswordToken>, StoreError>;

    /// Newest live-or-expired token for a user, if any.
    async fn find_token_for_user(&self, user_id: Uuid)
        -> Result<Option<PasswordToken>, StoreError>;

    /// Returns whether a row was actually removed.
    async fn delete_token(&self, token: &str) -> Result<bool, StoreError>;

    /// Atomically deletes the token iff it exists and is unexpired at `now`,
    /// returning it. Two concurrent calls for the same token can never both
    /// get `Some`.
    async fn consume_token(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<PasswordToken>, StoreError>;

    /// `field` must be one of [`crate::models::user::LOOKUP_FIELDS`].
    async fn find_user_by(&self, field: &str, value: &str) -> Result<Option<User>, StoreError>;

    async fn update_credential(&self, user_id: Uuid, credential: &str) -> Result<(), StoreError>;
}
