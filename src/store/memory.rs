use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::models::{PasswordToken, User};
use crate::store::{Store, StoreError};

/// In-memory [`Store`] for tests and local development without Postgres.
/// Mutex-guarded maps give the same at-most-once consumption guarantee as
/// the conditional delete in the Postgres store.
#[derive(Default)]
pub struct MemoryStore {
    tokens: Mutex<HashMap<String, PasswordToken>>,
    users: Mutex<HashMap<Uuid, User>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_user(&self, user: User) {
        self.users.lock().unwrap().insert(user.id, user);
    }

    pub fn get_user(&self, id: Uuid) -> Option<User> {
        self.users.lock().unwrap().get(&id).cloned()
    }

    pub fn token_count(&self) -> usize {
        self.tokens.lock().unwrap().len()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn save_token(&self, token: &PasswordToken) -> Result<(), StoreError> {
        let mut tokens = self.tokens.lock().unwrap();
        if tokens.contains_key(&token.token) {
            return Err(StoreError::Conflict);
        }
        tokens.insert(token.token.clone(), token.clone());
        Ok(())
    }

    async fn find_token(&self, token: &str) -> Result<Option<PasswordToken>, StoreError> {
        Ok(self.tokens.lock().unwrap().get(token).cloned())
    }

    async fn find_token_for_user(
        &self,
        user_id: Uuid,
    ) -> Result<Option<PasswordToken>, StoreError> {
        let tokens = self.tokens.lock().unwrap();
        Ok(tokens
            .values()
            .filter(|t| t.user_id == user_id)
            .max_by_key(|t| t.created_at)
            .cloned())
    }

    async fn delete_token(&self, token: &str) -> Result<bool, StoreError> {
        Ok(self.tokens.lock().unwrap().remove(token).is_some())
    }

    async fn consume_token(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<PasswordToken>, StoreError> {
        let mut tokens = self.tokens.lock().unwrap();
        match tokens.get(token) {
            Some(found) if !found.is_expired(now) => Ok(tokens.remove(token)),
            // Expired rows stay put; expiry is lazy and purging is a
            // housekeeping concern, not a lookup side effect.
            _ => Ok(None),
        }
    }

    async fn find_user_by(&self, field: &str, value: &str) -> Result<Option<User>, StoreError> {
        let users = self.users.lock().unwrap();
        let matched = match field {
            "email" => users.values().find(|u| u.email == value),
            "username" => users.values().find(|u| u.username == value),
            _ => {
                return Err(StoreError::Backend(format!(
                    "unknown lookup column: {field}"
                )));
            }
        };
        Ok(matched.cloned())
    }

    async fn update_credential(&self, user_id: Uuid, credential: &str) -> Result<(), StoreError> {
        let mut users = self.users.lock().unwrap();
        match users.get_mut(&user_id) {
            Some(user) => {
                user.password = credential.to_string();
                Ok(())
            }
            None => Err(StoreError::Backend(format!("no such user: {user_id}"))),
        }
    }
}
