use std::sync::Arc;

use chrono::Utc;

use crate::config::Config;
use crate::email::Notifier;
use crate::error::ResetError;
use crate::provider::ProviderRegistry;
use crate::store::Store;
use crate::token_manager::PasswordTokenManager;

/// Orchestrates the two reset flows on top of the token manager: request a
/// reset (enumeration-safe) and consume a token (single-use).
pub struct ForgotPasswordService {
    store: Arc<dyn Store>,
    manager: PasswordTokenManager,
    providers: ProviderRegistry,
    notifier: Arc<dyn Notifier>,
    authorized_fields: Vec<String>,
    default_provider: String,
    replace_existing: bool,
}

impl ForgotPasswordService {
    pub fn new(
        store: Arc<dyn Store>,
        notifier: Arc<dyn Notifier>,
        providers: ProviderRegistry,
        config: &Config,
    ) -> Self {
        let manager = PasswordTokenManager::new(store.clone(), config.default_ttl);
        Self {
            store,
            manager,
            providers,
            notifier,
            authorized_fields: config.authorized_fields.clone(),
            default_provider: config.default_provider.clone(),
            replace_existing: config.replace_existing,
        }
    }

    /// Looks up a user by an authorized field and, if one matches, creates a
    /// token and hands it to the notifier. A miss is reported as success so
    /// callers can't probe which accounts exist.
    pub async fn request_reset(
        &self,
        field: &str,
        value: &str,
        provider: Option<&str>,
    ) -> Result<(), ResetError> {
        if !self.authorized_fields.iter().any(|f| f == field) {
            return Err(ResetError::InvalidField(field.to_string()));
        }

        let provider_name = provider.unwrap_or(&self.default_provider);
        let provider = self
            .providers
            .get(provider_name)
            .ok_or_else(|| ResetError::UnknownProvider(provider_name.to_string()))?;

        let Some(user) = self.store.find_user_by(field, value).await? else {
            tracing::debug!("No user matched {field} lookup");
            return Ok(());
        };

        if self.replace_existing {
            if let Some(previous) = self.manager.find_by_user(user.id).await? {
                self.store.delete_token(&previous.token).await?;
            }
        }

        let token = self.manager.create_token(user.id, None).await?;

        match provider.recipient(&user) {
            Some(recipient) => {
                if let Err(e) = self.notifier.send(&recipient, &token).await {
                    tracing::error!("Failed to send reset notification: {e}");
                }
            }
            None => {
                tracing::warn!(
                    "Provider \"{provider_name}\" resolved no recipient for user {}",
                    user.id
                );
            }
        }

        Ok(())
    }

    /// Read-only probe for "does this link still work" UIs.
    pub async fn validate_token(&self, token: &str) -> Result<(), ResetError> {
        let found = self
            .manager
            .find_by_token(token)
            .await?
            .ok_or(ResetError::TokenNotFound)?;
        if found.is_expired(Utc::now()) {
            return Err(ResetError::TokenExpired);
        }
        Ok(())
    }

    /// Atomically consumes the token and applies the new credential to its
    /// user. At most one concurrent caller can succeed per token.
    pub async fn consume_token(
        &self,
        token: &str,
        new_credential: &str,
    ) -> Result<(), ResetError> {
        if new_credential.is_empty() {
            return Err(ResetError::MissingCredential);
        }

        let consumed = self
            .store
            .consume_token(token, Utc::now())
            .await?
            .ok_or(ResetError::TokenNotFound)?;

        self.store
            .update_credential(consumed.user_id, new_credential)
            .await?;
        Ok(())
    }
}
