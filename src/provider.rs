use std::collections::HashMap;
use std::sync::Arc;

use crate::models::User;

/// A named strategy for resolving the notification recipient of a reset
/// request. Deployments register additional providers (e.g. one that targets
/// a recovery address) alongside the built-in email provider.
pub trait Provider: Send + Sync {
    fn name(&self) -> &str;

    /// `None` means the user has no usable target for this strategy; the
    /// reset request still succeeds, it just sends nothing.
    fn recipient(&self, user: &User) -> Option<String>;
}

pub struct EmailProvider;

impl Provider for EmailProvider {
    fn name(&self) -> &str {
        "email"
    }

    fn recipient(&self, user: &User) -> Option<String> {
        if user.email.is_empty() {
            None
        } else {
            Some(user.email.clone())
        }
    }
}

pub struct ProviderRegistry {
    providers: HashMap<String, Arc<dyn Provider>>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self {
            providers: HashMap::new(),
        }
    }

    pub fn register(&mut self, provider: Arc<dyn Provider>) {
        self.providers.insert(provider.name().to_string(), provider);
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn Provider>> {
        self.providers.get(name)
    }
}
