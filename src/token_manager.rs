use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use crate::models::PasswordToken;
use crate::store::{Store, StoreError};

/// 25 random bytes hex-encoded: 50 chars, 200 bits of entropy.
const TOKEN_BYTES: usize = 25;

/// Generates an opaque token string from the thread-local CSPRNG.
pub fn generate_token() -> String {
    let bytes: [u8; TOKEN_BYTES] = rand::random();
    hex::encode(bytes)
}

/// Owns token creation, lookup and expiry defaults. Single-use and
/// enumeration-safety semantics live in the reset service, not here.
pub struct PasswordTokenManager {
    store: Arc<dyn Store>,
    default_ttl: Duration,
}

impl PasswordTokenManager {
    pub fn new(store: Arc<dyn Store>, default_ttl: Duration) -> Self {
        Self { store, default_ttl }
    }

    /// Creates and persists a token for `user_id`, expiring at `expires_at`
    /// or `now + default_ttl`. Regenerates on a token-string collision.
    pub async fn create_token(
        &self,
        user_id: Uuid,
        expires_at: Option<DateTime<Utc>>,
    ) -> Result<PasswordToken, StoreError> {
        let expires_at = expires_at.unwrap_or_else(|| Utc::now() + self.default_ttl);
        loop {
            let token = PasswordToken {
                token: generate_token(),
                user_id,
                expires_at,
                created_at: Utc::now(),
            };
            match self.store.save_token(&token).await {
                Ok(()) => return Ok(token),
                Err(StoreError::Conflict) => {
                    tracing::warn!("Token string collision, regenerating");
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Exact-match lookup. Callers are responsible for the expiry check.
    pub async fn find_by_token(&self, token: &str) -> Result<Option<PasswordToken>, StoreError> {
        self.store.find_token(token).await
    }

    /// Newest existing token for a user, if any.
    pub async fn find_by_user(&self, user_id: Uuid) -> Result<Option<PasswordToken>, StoreError> {
        self.store.find_token_for_user(user_id).await
    }
}
