use super::keys::BOOKMARKS_KEY;
use super::store::{fail_soft, LocalStore};
use super::types::{Article, StoreError};

/// The user's bookmarked ("scrapped") articles, newest first.
pub struct BookmarkStore<'a> {
    store: &'a LocalStore,
}

impl LocalStore {
    pub fn bookmarks(&self) -> BookmarkStore<'_> {
        BookmarkStore { store: self }
    }
}

impl BookmarkStore<'_> {
    // ========================================================================
    // Bookmark Operations
    // ========================================================================

    /// All bookmarks, most recently added first.
    ///
    /// Empty when nothing is stored, the record is corrupt, or the backend
    /// fails.
    pub async fn list(&self) -> Vec<Article> {
        fail_soft("bookmarks.list", self.try_list().await, Vec::new)
    }

    /// Bookmark `article`.
    ///
    /// Returns `false` without writing if an article with the same id is
    /// already bookmarked. The stored copy always has `is_bookmarked` set.
    pub async fn add(&self, article: &Article) -> bool {
        fail_soft("bookmarks.add", self.try_add(article).await, || false)
    }

    /// Remove the bookmark with `article_id`.
    ///
    /// Idempotent: the filtered list is written back and `true` returned even
    /// when no such bookmark existed.
    pub async fn remove(&self, article_id: &str) -> bool {
        fail_soft("bookmarks.remove", self.try_remove(article_id).await, || false)
    }

    pub async fn is_bookmarked(&self, article_id: &str) -> bool {
        self.list().await.iter().any(|a| a.id == article_id)
    }

    pub(crate) async fn try_list(&self) -> Result<Vec<Article>, StoreError> {
        let key = self.store.key_for(BOOKMARKS_KEY).await;
        self.store.read_record(&key).await
    }

    async fn try_add(&self, article: &Article) -> Result<bool, StoreError> {
        let key = self.store.key_for(BOOKMARKS_KEY).await;
        let _guard = self.store.lock(&key).await;

        let mut bookmarks: Vec<Article> = self.store.read_record(&key).await?;
        if bookmarks.iter().any(|a| a.id == article.id) {
            tracing::debug!(id = %article.id, "Article already bookmarked");
            return Ok(false);
        }

        bookmarks.insert(
            0,
            Article {
                is_bookmarked: true,
                ..article.clone()
            },
        );
        self.store.write_record(&key, &bookmarks).await?;
        tracing::debug!(id = %article.id, total = bookmarks.len(), "Bookmark added");
        Ok(true)
    }

    async fn try_remove(&self, article_id: &str) -> Result<bool, StoreError> {
        let key = self.store.key_for(BOOKMARKS_KEY).await;
        let _guard = self.store.lock(&key).await;

        let mut bookmarks: Vec<Article> = self.store.read_record(&key).await?;
        bookmarks.retain(|a| a.id != article_id);
        self.store.write_record(&key, &bookmarks).await?;
        tracing::debug!(id = %article_id, total = bookmarks.len(), "Bookmark removed");
        Ok(true)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::sync::Arc;

    use pretty_assertions::assert_eq;

    use crate::storage::backend::flaky::FlakyStore;
    use crate::storage::{Article, FixedSession, KeyValueStore, LocalStore, MemoryStore};

    fn test_store() -> LocalStore {
        LocalStore::new(
            Arc::new(MemoryStore::new()),
            Arc::new(FixedSession::anonymous()),
        )
    }

    pub(crate) fn test_article(id: &str) -> Article {
        Article {
            id: id.to_string(),
            category: "경제".to_string(),
            title: format!("Title {}", id),
            subtitle: "Subtitle".to_string(),
            summary: Some("Summary".to_string()),
            date: "2026-10-19".to_string(),
            source: "네이버뉴스".to_string(),
            image: format!("https://example.com/{}.png", id),
            read_time: None,
            original_url: Some(format!("https://example.com/{}", id)),
            trend_rank: None,
            is_bookmarked: false,
        }
    }

    #[tokio::test]
    async fn test_list_empty() {
        let store = test_store();
        assert!(store.bookmarks().list().await.is_empty());
    }

    #[tokio::test]
    async fn test_add_sets_bookmarked_flag() {
        let store = test_store();
        assert!(store.bookmarks().add(&test_article("news_1")).await);

        let list = store.bookmarks().list().await;
        assert_eq!(list.len(), 1);
        assert!(list[0].is_bookmarked);
        assert_eq!(
            list[0],
            Article {
                is_bookmarked: true,
                ..test_article("news_1")
            }
        );
    }

    #[tokio::test]
    async fn test_add_duplicate_is_noop() {
        let store = test_store();
        let bookmarks = store.bookmarks();
        assert!(bookmarks.add(&test_article("a")).await);
        assert!(bookmarks.add(&test_article("b")).await);

        let mut changed = test_article("a");
        changed.title = "Different title".to_string();
        assert!(!bookmarks.add(&changed).await);

        let list = bookmarks.list().await;
        let ids: Vec<&str> = list.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);
        assert_eq!(list[1].title, "Title a");
    }

    #[tokio::test]
    async fn test_newest_first() {
        let store = test_store();
        for id in ["a", "b", "c"] {
            store.bookmarks().add(&test_article(id)).await;
        }
        let ids: Vec<String> = store
            .bookmarks()
            .list()
            .await
            .into_iter()
            .map(|a| a.id)
            .collect();
        assert_eq!(ids, vec!["c", "b", "a"]);
    }

    #[tokio::test]
    async fn test_remove_missing_is_idempotent() {
        let store = test_store();
        store.bookmarks().add(&test_article("a")).await;

        assert!(store.bookmarks().remove("missing").await);
        assert_eq!(store.bookmarks().list().await.len(), 1);

        assert!(store.bookmarks().remove("a").await);
        assert!(store.bookmarks().remove("a").await);
        assert!(store.bookmarks().list().await.is_empty());
    }

    #[tokio::test]
    async fn test_is_bookmarked() {
        let store = test_store();
        store.bookmarks().add(&test_article("a")).await;
        assert!(store.bookmarks().is_bookmarked("a").await);
        assert!(!store.bookmarks().is_bookmarked("b").await);
    }

    #[tokio::test]
    async fn test_corrupt_record_reads_empty() {
        let kv = Arc::new(MemoryStore::new());
        kv.set("@SummaNews:bookmarks", "<html>oops</html>")
            .await
            .unwrap();
        let store = LocalStore::new(kv, Arc::new(FixedSession::anonymous()));

        assert!(store.bookmarks().list().await.is_empty());
        // A corrupt list is replaced on the next add
        assert!(store.bookmarks().add(&test_article("a")).await);
        assert_eq!(store.bookmarks().list().await.len(), 1);
    }

    #[tokio::test]
    async fn test_client_records_with_null_fields_survive_add() {
        let kv = Arc::new(MemoryStore::new());
        kv.set(
            "@SummaNews:bookmarks",
            r#"[{"id":"news_1","title":null,"category":"경제","isBookmarked":true},
                {"id":"news_2","title":"ok","category":"세계","isBookmarked":true}]"#,
        )
        .await
        .unwrap();
        let store = LocalStore::new(kv, Arc::new(FixedSession::anonymous()));

        assert_eq!(store.bookmarks().list().await.len(), 2);
        assert!(store.bookmarks().add(&test_article("news_3")).await);

        let ids: Vec<String> = store
            .bookmarks()
            .list()
            .await
            .into_iter()
            .map(|a| a.id)
            .collect();
        assert_eq!(ids, vec!["news_3", "news_1", "news_2"]);
    }

    #[tokio::test]
    async fn test_backend_failures_are_absorbed() {
        let kv = Arc::new(FlakyStore::default());
        let store = LocalStore::new(kv.clone(), Arc::new(FixedSession::anonymous()));
        store.bookmarks().add(&test_article("a")).await;

        kv.fail_writes(true);
        assert!(!store.bookmarks().add(&test_article("b")).await);
        assert!(!store.bookmarks().remove("a").await);

        kv.fail_reads(true);
        assert!(store.bookmarks().list().await.is_empty());
        assert!(!store.bookmarks().is_bookmarked("a").await);

        kv.fail_reads(false);
        kv.fail_writes(false);
        let ids: Vec<String> = store
            .bookmarks()
            .list()
            .await
            .into_iter()
            .map(|a| a.id)
            .collect();
        assert_eq!(ids, vec!["a"]);
    }

    #[tokio::test]
    async fn test_concurrent_adds_are_serialized() {
        let store = test_store();
        let tasks: Vec<_> = (0..20)
            .map(|i| {
                let store = store.clone();
                tokio::spawn(async move { store.bookmarks().add(&test_article(&format!("n{i}"))).await })
            })
            .collect();
        for task in tasks {
            assert!(task.await.unwrap());
        }
        assert_eq!(store.bookmarks().list().await.len(), 20);
    }
}
