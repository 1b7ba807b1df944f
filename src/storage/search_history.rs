use super::keys::SEARCH_HISTORY_KEY;
use super::store::{fail_soft, LocalStore};
use super::types::StoreError;

/// Maximum number of past queries kept.
pub const MAX_SEARCH_HISTORY: usize = 10;

/// Past search queries, most recent first, without duplicates.
pub struct SearchHistoryStore<'a> {
    store: &'a LocalStore,
}

impl LocalStore {
    pub fn search_history(&self) -> SearchHistoryStore<'_> {
        SearchHistoryStore { store: self }
    }
}

impl SearchHistoryStore<'_> {
    pub async fn list(&self) -> Vec<String> {
        fail_soft("search_history.list", self.try_list().await, Vec::new)
    }

    /// Record an executed query.
    ///
    /// A repeated query moves to the front instead of appearing twice; the
    /// oldest entries fall off past [`MAX_SEARCH_HISTORY`].
    pub async fn record(&self, query: &str) {
        fail_soft("search_history.record", self.try_record(query).await, || ())
    }

    /// Forget all past queries (removes the record entirely).
    pub async fn clear(&self) {
        fail_soft("search_history.clear", self.try_clear().await, || ())
    }

    async fn try_list(&self) -> Result<Vec<String>, StoreError> {
        let key = self.store.key_for(SEARCH_HISTORY_KEY).await;
        self.store.read_record(&key).await
    }

    async fn try_record(&self, query: &str) -> Result<(), StoreError> {
        let key = self.store.key_for(SEARCH_HISTORY_KEY).await;
        let _guard = self.store.lock(&key).await;

        let mut history: Vec<String> = self.store.read_record(&key).await?;
        history.retain(|q| q != query);
        history.insert(0, query.to_string());
        history.truncate(MAX_SEARCH_HISTORY);
        self.store.write_record(&key, &history).await
    }

    async fn try_clear(&self) -> Result<(), StoreError> {
        let key = self.store.key_for(SEARCH_HISTORY_KEY).await;
        self.store.remove_key(&key).await
    }
}
