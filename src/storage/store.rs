use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::OwnedMutexGuard;

use super::backend::KeyValueStore;
use super::codec;
use super::locks::KeyLocks;
use super::scope::{SessionProvider, UserScope};
use super::types::StoreError;

// ============================================================================
// LocalStore
// ============================================================================

/// Entry point to the persistence layer.
///
/// Owns the backend, the user scope and the per-key write locks. The
/// individual stores ([`BookmarkStore`](super::BookmarkStore) and friends)
/// are cheap borrowed views obtained from accessor methods.
///
/// Every public store operation is total: backend failures are logged and
/// replaced by an empty or default result.
#[derive(Clone)]
pub struct LocalStore {
    kv: Arc<dyn KeyValueStore>,
    scope: UserScope,
    locks: Option<KeyLocks>,
}

impl LocalStore {
    pub fn new(kv: Arc<dyn KeyValueStore>, session: Arc<dyn SessionProvider>) -> Self {
        Self {
            kv,
            scope: UserScope::new(session),
            locks: Some(KeyLocks::new()),
        }
    }

    /// Drop per-key write serialization.
    ///
    /// Concurrent read-modify-write cycles on one record then race, and the
    /// last writer wins, as in the mobile client.
    pub fn without_write_serialization(mut self) -> Self {
        self.locks = None;
        self
    }

    pub fn backend(&self) -> &Arc<dyn KeyValueStore> {
        &self.kv
    }

    pub fn scope(&self) -> &UserScope {
        &self.scope
    }

    // ========================================================================
    // Record plumbing shared by the stores
    // ========================================================================

    pub(crate) async fn key_for(&self, base: &str) -> String {
        self.scope.resolve_key(base).await
    }

    /// Hold the write lock for `key` (no-op when serialization is off).
    pub(crate) async fn lock(&self, key: &str) -> Option<OwnedMutexGuard<()>> {
        match &self.locks {
            Some(locks) => Some(locks.acquire(key).await),
            None => None,
        }
    }

    pub(crate) async fn read_record<T>(&self, key: &str) -> Result<T, StoreError>
    where
        T: DeserializeOwned + Default,
    {
        let raw = self.kv.get(key).await?;
        Ok(codec::decode_or_default(key, raw.as_deref()))
    }

    pub(crate) async fn read_optional<T>(&self, key: &str) -> Result<Option<T>, StoreError>
    where
        T: DeserializeOwned,
    {
        let raw = self.kv.get(key).await?;
        Ok(codec::decode(key, raw.as_deref()))
    }

    pub(crate) async fn write_record<T>(&self, key: &str, value: &T) -> Result<(), StoreError>
    where
        T: Serialize + ?Sized,
    {
        let text = codec::encode(value)?;
        self.kv.set(key, &text).await
    }

    pub(crate) async fn remove_key(&self, key: &str) -> Result<(), StoreError> {
        self.kv.remove(key).await
    }
}

/// Apply the fail-soft policy at an operation boundary.
pub(crate) fn fail_soft<T>(
    op: &'static str,
    result: Result<T, StoreError>,
    fallback: impl FnOnce() -> T,
) -> T {
    match result {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!(op = op, error = %e, "Store operation failed, returning fallback");
            fallback()
        }
    }
}
