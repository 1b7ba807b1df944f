use super::keys::{DEVICE_KEYS, GLOBAL_SESSION_KEYS, PER_USER_KEYS};
use super::scope::scoped_key;
use super::store::LocalStore;

impl LocalStore {
    // ========================================================================
    // Full Reset
    // ========================================================================

    /// Delete all of the current user's records, the device-wide preference
    /// keys and the global session keys.
    ///
    /// Run when an account is created so the fresh namespace starts clean.
    /// Best-effort: every key is attempted even if an earlier delete failed,
    /// and nothing is rolled back.
    pub async fn clear_all(&self) {
        // Resolve before the userId key itself is deleted
        let user_id = self.scope().user_id().await;

        let keys = PER_USER_KEYS
            .iter()
            .map(|base| scoped_key(base, user_id.as_deref()))
            .chain(DEVICE_KEYS.iter().map(|k| k.to_string()))
            .chain(GLOBAL_SESSION_KEYS.iter().map(|k| k.to_string()));

        let mut failed = 0usize;
        for key in keys {
            if let Err(e) = self.remove_key(&key).await {
                failed += 1;
                tracing::warn!(key = %key, error = %e, "Failed to clear key during reset");
            }
        }

        tracing::info!(
            user_id = user_id.as_deref().unwrap_or("<anonymous>"),
            failed,
            "User data reset"
        );
    }
}
