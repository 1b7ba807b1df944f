use super::keys::SELECTED_CATEGORIES_KEY;
use super::store::{fail_soft, LocalStore};
use super::types::StoreError;

/// The categories a user follows, in their chosen tab order.
pub struct CategoryStore<'a> {
    store: &'a LocalStore,
}

impl LocalStore {
    pub fn categories(&self) -> CategoryStore<'_> {
        CategoryStore { store: self }
    }
}

impl CategoryStore<'_> {
    pub async fn get(&self) -> Vec<String> {
        fail_soft("categories.get", self.try_get().await, Vec::new)
    }

    /// Replace the selection. Order is kept; repeats and blank labels are
    /// dropped (first occurrence wins).
    pub async fn save(&self, categories: &[String]) -> bool {
        fail_soft(
            "categories.save",
            self.try_save(categories).await.map(|()| true),
            || false,
        )
    }

    async fn try_get(&self) -> Result<Vec<String>, StoreError> {
        self.store.read_record(SELECTED_CATEGORIES_KEY).await
    }

    async fn try_save(&self, categories: &[String]) -> Result<(), StoreError> {
        let mut unique: Vec<&str> = Vec::with_capacity(categories.len());
        for category in categories.iter().map(|c| c.trim()) {
            if !category.is_empty() && !unique.contains(&category) {
                unique.push(category);
            }
        }

        self.store.write_record(SELECTED_CATEGORIES_KEY, &unique).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::storage::{FixedSession, KeyValueStore, LocalStore, MemoryStore};

    fn labels(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn test_empty_by_default() {
        let store = LocalStore::new(
            Arc::new(MemoryStore::new()),
            Arc::new(FixedSession::anonymous()),
        );
        assert!(store.categories().get().await.is_empty());
    }

    #[tokio::test]
    async fn test_order_kept_and_duplicates_dropped() {
        let store = LocalStore::new(
            Arc::new(MemoryStore::new()),
            Arc::new(FixedSession::user("u")),
        );
        let chosen = labels(&["IT/과학", "경제", " ", "IT/과학", "세계"]);
        assert!(store.categories().save(&chosen).await);

        assert_eq!(
            store.categories().get().await,
            labels(&["IT/과학", "경제", "세계"])
        );
    }

    #[tokio::test]
    async fn test_reorder_overwrites() {
        let store = LocalStore::new(
            Arc::new(MemoryStore::new()),
            Arc::new(FixedSession::user("u")),
        );
        store.categories().save(&labels(&["정치", "경제"])).await;
        store.categories().save(&labels(&["경제", "정치"])).await;

        assert_eq!(store.categories().get().await, labels(&["경제", "정치"]));
    }

    #[tokio::test]
    async fn test_selection_is_shared_across_users() {
        let kv = Arc::new(MemoryStore::new());
        kv.set("selectedCategories", r#"["정치","세계"]"#)
            .await
            .unwrap();

        let signed_in = LocalStore::new(kv.clone(), Arc::new(FixedSession::user("uid-9")));
        assert_eq!(signed_in.categories().get().await, labels(&["정치", "세계"]));

        signed_in.categories().save(&labels(&["경제"])).await;
        assert!(kv.contains_key("selectedCategories").await);
        assert!(!kv.contains_key("selectedCategories:uid-9").await);
    }
}
