use chrono::Utc;

use super::keys::USER_STATS_KEY;
use super::store::{fail_soft, LocalStore};
use super::types::{StoreError, UserStats};

/// Per-user reading counters.
///
/// The scrap counter is not tied to the bookmark list automatically; callers
/// run [`recompute_scrap_count`](Self::recompute_scrap_count) after adding or
/// removing bookmarks.
pub struct UserStatsStore<'a> {
    store: &'a LocalStore,
}

impl LocalStore {
    pub fn user_stats(&self) -> UserStatsStore<'_> {
        UserStatsStore { store: self }
    }
}

impl UserStatsStore<'_> {
    pub async fn get(&self) -> UserStats {
        fail_soft("user_stats.get", self.try_get().await, UserStats::default)
    }

    pub async fn save(&self, stats: &UserStats) -> bool {
        fail_soft(
            "user_stats.save",
            self.try_save(stats).await.map(|()| true),
            || false,
        )
    }

    /// Count one more article read.
    pub async fn increment_read_articles(&self) -> bool {
        fail_soft(
            "user_stats.increment_read_articles",
            self.try_increment_read().await.map(|()| true),
            || false,
        )
    }

    /// Overwrite the scrap counter with the current bookmark count.
    pub async fn recompute_scrap_count(&self) -> bool {
        fail_soft(
            "user_stats.recompute_scrap_count",
            self.try_recompute_scrap().await.map(|()| true),
            || false,
        )
    }

    async fn try_get(&self) -> Result<UserStats, StoreError> {
        let key = self.store.key_for(USER_STATS_KEY).await;
        self.store.read_record(&key).await
    }

    async fn try_save(&self, stats: &UserStats) -> Result<(), StoreError> {
        let key = self.store.key_for(USER_STATS_KEY).await;
        self.store.write_record(&key, stats).await
    }

    async fn try_increment_read(&self) -> Result<(), StoreError> {
        let key = self.store.key_for(USER_STATS_KEY).await;
        let _guard = self.store.lock(&key).await;

        let mut stats: UserStats = self.store.read_record(&key).await?;
        stats.read_articles = stats.read_articles.saturating_add(1);
        stats.last_updated = Some(Utc::now());
        self.store.write_record(&key, &stats).await
    }

    async fn try_recompute_scrap(&self) -> Result<(), StoreError> {
        let scraps = self.store.bookmarks().try_list().await?.len() as u64;

        let key = self.store.key_for(USER_STATS_KEY).await;
        let _guard = self.store.lock(&key).await;

        let mut stats: UserStats = self.store.read_record(&key).await?;
        stats.scrap_articles = scraps;
        stats.last_updated = Some(Utc::now());
        self.store.write_record(&key, &stats).await?;
        tracing::debug!(scraps, "Scrap count recomputed");
        Ok(())
    }
}
