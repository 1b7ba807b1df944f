use super::keys::NOTIFICATION_SETTINGS_KEY;
use super::store::{fail_soft, LocalStore};
use super::types::{NotificationSettings, StoreError};

/// The user's notification preferences, stored as one whole record.
///
/// There is no field-level update: callers read, modify and save the full
/// record.
pub struct NotificationSettingsStore<'a> {
    store: &'a LocalStore,
}

impl LocalStore {
    pub fn notification_settings(&self) -> NotificationSettingsStore<'_> {
        NotificationSettingsStore { store: self }
    }
}

impl NotificationSettingsStore<'_> {
    /// Stored settings, or the defaults (disabled, no categories, daily).
    pub async fn get(&self) -> NotificationSettings {
        fail_soft(
            "notification_settings.get",
            self.try_get().await,
            NotificationSettings::default,
        )
    }

    /// Replace the stored settings wholesale.
    pub async fn save(&self, settings: &NotificationSettings) -> bool {
        fail_soft(
            "notification_settings.save",
            self.try_save(settings).await.map(|()| true),
            || false,
        )
    }

    async fn try_get(&self) -> Result<NotificationSettings, StoreError> {
        let key = self.store.key_for(NOTIFICATION_SETTINGS_KEY).await;
        self.store.read_record(&key).await
    }

    async fn try_save(&self, settings: &NotificationSettings) -> Result<(), StoreError> {
        let key = self.store.key_for(NOTIFICATION_SETTINGS_KEY).await;
        self.store.write_record(&key, settings).await?;
        tracing::debug!(
            enabled = settings.enabled,
            frequency = %settings.frequency,
            categories = settings.categories.len(),
            "Notification settings saved"
        );
        Ok(())
    }
}
