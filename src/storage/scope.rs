use std::sync::Arc;

use async_trait::async_trait;

use super::backend::KeyValueStore;
use super::keys::USER_ID_KEY;

/// Source of the signed-in user's identifier.
///
/// Read-only from the store's point of view: nothing in this crate writes
/// the identity through a provider.
#[async_trait]
pub trait SessionProvider: Send + Sync {
    /// The current user id, or `None` when nobody is signed in.
    async fn current_user_id(&self) -> Option<String>;
}

/// A session pinned to one identity (or to the anonymous namespace).
#[derive(Debug, Clone, Default)]
pub struct FixedSession {
    user_id: Option<String>,
}

impl FixedSession {
    pub fn user(user_id: impl Into<String>) -> Self {
        Self {
            user_id: Some(user_id.into()),
        }
    }

    pub fn anonymous() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionProvider for FixedSession {
    async fn current_user_id(&self) -> Option<String> {
        self.user_id.clone()
    }
}

/// Reads the user id the client stores under the global `userId` key.
#[derive(Clone)]
pub struct StoredSession {
    kv: Arc<dyn KeyValueStore>,
}

impl StoredSession {
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self { kv }
    }
}

#[async_trait]
impl SessionProvider for StoredSession {
    async fn current_user_id(&self) -> Option<String> {
        match self.kv.get(USER_ID_KEY).await {
            Ok(user_id) => user_id,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read session user id, using global namespace");
                None
            }
        }
    }
}

/// Build the storage key for `base` under an optional user id.
///
/// An empty id counts as signed out, so data written before multi-user
/// support (under the bare key) stays reachable.
pub fn scoped_key(base: &str, user_id: Option<&str>) -> String {
    match user_id {
        Some(id) if !id.is_empty() => format!("{}:{}", base, id),
        _ => base.to_string(),
    }
}

/// Namespaces storage keys by the active user.
#[derive(Clone)]
pub struct UserScope {
    session: Arc<dyn SessionProvider>,
}

impl UserScope {
    pub fn new(session: Arc<dyn SessionProvider>) -> Self {
        Self { session }
    }

    pub async fn user_id(&self) -> Option<String> {
        self.session.current_user_id().await
    }

    /// `base:<userId>` when signed in, `base` otherwise.
    pub async fn resolve_key(&self, base: &str) -> String {
        let user_id = self.user_id().await;
        scoped_key(base, user_id.as_deref())
    }
}
