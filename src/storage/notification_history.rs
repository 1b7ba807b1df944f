use chrono::{SecondsFormat, Utc};

use super::keys::NOTIFICATION_HISTORY_KEY;
use super::store::{fail_soft, LocalStore};
use super::types::{NotificationRecord, StoreError};

/// Inbox of notifications already delivered to the user, newest first.
pub struct NotificationHistoryStore<'a> {
    store: &'a LocalStore,
}

impl LocalStore {
    pub fn notification_history(&self) -> NotificationHistoryStore<'_> {
        NotificationHistoryStore { store: self }
    }
}

impl NotificationHistoryStore<'_> {
    pub async fn list(&self) -> Vec<NotificationRecord> {
        fail_soft("notification_history.list", self.try_list().await, Vec::new)
    }

    /// Record a delivered notification as unread. Returns the stored entry,
    /// or `None` if it could not be saved.
    pub async fn push(&self, title: &str, body: &str) -> Option<NotificationRecord> {
        fail_soft(
            "notification_history.push",
            self.try_push(title, body).await.map(Some),
            || None,
        )
    }

    /// Mark the entry with `id` as read. `false` when no entry matches.
    pub async fn mark_read(&self, id: &str) -> bool {
        fail_soft(
            "notification_history.mark_read",
            self.try_mark_read(id).await,
            || false,
        )
    }

    pub async fn unread_count(&self) -> usize {
        self.list().await.iter().filter(|n| !n.read).count()
    }

    pub async fn clear(&self) {
        fail_soft("notification_history.clear", self.try_clear().await, || ())
    }

    async fn try_list(&self) -> Result<Vec<NotificationRecord>, StoreError> {
        self.store.read_record(NOTIFICATION_HISTORY_KEY).await
    }

    async fn try_push(&self, title: &str, body: &str) -> Result<NotificationRecord, StoreError> {
        let key = NOTIFICATION_HISTORY_KEY;
        let _guard = self.store.lock(key).await;

        let mut history: Vec<NotificationRecord> = self.store.read_record(key).await?;

        let now = Utc::now();
        // Ids are creation millis; bump past any entry from the same millisecond
        let mut millis = now.timestamp_millis();
        while history.iter().any(|n| n.id == millis.to_string()) {
            millis += 1;
        }

        let record = NotificationRecord {
            id: millis.to_string(),
            title: title.to_string(),
            body: body.to_string(),
            timestamp: now.to_rfc3339_opts(SecondsFormat::Millis, true),
            read: false,
        };
        history.insert(0, record.clone());
        self.store.write_record(key, &history).await?;
        Ok(record)
    }

    async fn try_mark_read(&self, id: &str) -> Result<bool, StoreError> {
        let key = NOTIFICATION_HISTORY_KEY;
        let _guard = self.store.lock(key).await;

        let mut history: Vec<NotificationRecord> = self.store.read_record(key).await?;
        let Some(entry) = history.iter_mut().find(|n| n.id == id) else {
            return Ok(false);
        };
        if entry.read {
            return Ok(true);
        }
        entry.read = true;
        self.store.write_record(key, &history).await?;
        Ok(true)
    }

    async fn try_clear(&self) -> Result<(), StoreError> {
        self.store.remove_key(NOTIFICATION_HISTORY_KEY).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::storage::{FixedSession, LocalStore, MemoryStore};

    fn test_store() -> LocalStore {
        LocalStore::new(
            Arc::new(MemoryStore::new()),
            Arc::new(FixedSession::user("inbox")),
        )
    }

    #[tokio::test]
    async fn test_push_newest_first_with_unique_ids() {
        let store = test_store();
        let inbox = store.notification_history();
        let first = inbox.push("오늘의 뉴스", "새로운 뉴스를 확인해보세요!").await.unwrap();
        let second = inbox.push("속보", "body").await.unwrap();

        assert_ne!(first.id, second.id);
        let list = inbox.list().await;
        assert_eq!(list.len(), 2);
        assert_eq!(list[0].title, "속보");
        assert!(!list[0].read);
        assert!(chrono::DateTime::parse_from_rfc3339(&list[0].timestamp).is_ok());
    }

    #[tokio::test]
    async fn test_mark_read() {
        let store = test_store();
        let inbox = store.notification_history();
        let a = inbox.push("a", "a").await.unwrap();
        inbox.push("b", "b").await.unwrap();
        assert_eq!(inbox.unread_count().await, 2);

        assert!(inbox.mark_read(&a.id).await);
        assert!(inbox.mark_read(&a.id).await);
        assert!(!inbox.mark_read("0").await);
        assert_eq!(inbox.unread_count().await, 1);
    }

    #[tokio::test]
    async fn test_clear() {
        let store = test_store();
        store.notification_history().push("a", "a").await;
        store.notification_history().clear().await;
        assert!(store.notification_history().list().await.is_empty());
    }

    #[tokio::test]
    async fn test_timestamp_uses_millisecond_utc_form() {
        let store = test_store();
        let record = store.notification_history().push("a", "b").await.unwrap();

        // e.g. 2026-10-19T13:02:21.418Z
        assert_eq!(record.timestamp.len(), 24);
        assert!(record.timestamp.ends_with('Z'));
        assert_eq!(&record.timestamp[19..20], ".");
    }

    #[tokio::test]
    async fn test_inbox_is_device_wide() {
        let kv = Arc::new(MemoryStore::new());
        let guest = LocalStore::new(kv.clone(), Arc::new(FixedSession::anonymous()));
        guest.notification_history().push("t", "b").await;

        let signed_in = LocalStore::new(kv.clone(), Arc::new(FixedSession::user("uid")));
        assert_eq!(signed_in.notification_history().list().await.len(), 1);
        assert!(kv.contains_key("notificationHistory").await);
    }
}
