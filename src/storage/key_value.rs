use async_trait::async_trait;

use super::backend::KeyValueStore;
use super::schema::Database;
use super::types::StoreError;

impl Database {
    // ========================================================================
    // Key-Value Operations
    // ========================================================================

    /// Get a single value by key.
    ///
    /// # Returns
    ///
    /// The stored text if the key exists, or `None` if not set.
    pub async fn get_value(&self, key: &str) -> Result<Option<String>, StoreError> {
        let row: Option<(String,)> =
            sqlx::query_as("SELECT value FROM key_value_store WHERE key = ?")
                .bind(key)
                .fetch_optional(&self.pool)
                .await?;

        Ok(row.map(|(value,)| value))
    }

    /// Set a value (UPSERT), refreshing `updated_at`.
    pub async fn set_value(&self, key: &str, value: &str) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO key_value_store (key, value, updated_at)
            VALUES (?, ?, datetime('now'))
            ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at
        "#,
        )
        .bind(key)
        .bind(value)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Delete a key. Deleting an absent key is not an error.
    pub async fn remove_value(&self, key: &str) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM key_value_store WHERE key = ?")
            .bind(key)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Get all entries whose key starts with `prefix`, ordered by key.
    ///
    /// Only used for diagnostics (`summanews dump`); the stores themselves
    /// never scan. `%` and `_` in the prefix are matched literally.
    pub async fn entries_with_prefix(&self, prefix: &str) -> Result<Vec<(String, String)>, StoreError> {
        let escaped = prefix
            .replace('\\', "\\\\")
            .replace('%', "\\%")
            .replace('_', "\\_");
        let pattern = format!("{}%", escaped);
        let rows: Vec<(String, String)> = sqlx::query_as(
            r"SELECT key, value FROM key_value_store WHERE key LIKE ? ESCAPE '\' ORDER BY key",
        )
        .bind(&pattern)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}

#[async_trait]
impl KeyValueStore for Database {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.get_value(key).await
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.set_value(key, value).await
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.remove_value(key).await
    }
}
