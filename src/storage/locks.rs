use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, OwnedMutexGuard};

type KeyLock = Arc<Mutex<()>>;

/// Per-storage-key write serialization.
///
/// Each read-modify-write cycle holds the lock for its resolved key, so two
/// concurrent writers of the same record within this process cannot lose
/// each other's update. Unrelated keys never contend.
#[derive(Clone, Default)]
pub struct KeyLocks {
    locks: Arc<Mutex<HashMap<String, KeyLock>>>,
}

impl KeyLocks {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn acquire(&self, key: &str) -> OwnedMutexGuard<()> {
        let mut map = self.locks.lock().await;
        let entry = map.entry(key.to_string()).or_default().clone();

        // Release the map so other keys can be locked while we wait
        drop(map);

        entry.lock_owned().await
    }
}
