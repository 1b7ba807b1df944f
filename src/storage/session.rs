use super::keys::{LOGIN_FLAG_KEY, USER_EMAIL_KEY, USER_ID_KEY, USER_NAME_KEY};
use super::store::{fail_soft, LocalStore};
use super::types::StoreError;

/// The global (never user-scoped) session keys written at sign-in.
pub struct SessionStore<'a> {
    store: &'a LocalStore,
}

impl LocalStore {
    pub fn session(&self) -> SessionStore<'_> {
        SessionStore { store: self }
    }
}

impl SessionStore<'_> {
    /// Persist a signed-in identity. A [`StoredSession`](super::StoredSession)
    /// over the same backend switches to this user's namespace.
    pub async fn sign_in(&self, user_id: &str, email: &str, name: &str) -> bool {
        fail_soft(
            "session.sign_in",
            self.try_sign_in(user_id, email, name).await.map(|()| true),
            || false,
        )
    }

    /// Forget the login flag, email and user id. The display name stays.
    pub async fn sign_out(&self) -> bool {
        fail_soft(
            "session.sign_out",
            self.try_sign_out().await.map(|()| true),
            || false,
        )
    }

    pub async fn is_logged_in(&self) -> bool {
        self.read(LOGIN_FLAG_KEY).await.as_deref() == Some("true")
    }

    pub async fn user_id(&self) -> Option<String> {
        self.read(USER_ID_KEY).await
    }

    pub async fn user_email(&self) -> Option<String> {
        self.read(USER_EMAIL_KEY).await
    }

    pub async fn user_name(&self) -> Option<String> {
        self.read(USER_NAME_KEY).await
    }

    async fn read(&self, key: &'static str) -> Option<String> {
        fail_soft("session.read", self.store.backend().get(key).await, || None)
    }

    async fn try_sign_in(&self, user_id: &str, email: &str, name: &str) -> Result<(), StoreError> {
        let kv = self.store.backend();
        kv.set(USER_ID_KEY, user_id).await?;
        kv.set(USER_EMAIL_KEY, email).await?;
        kv.set(USER_NAME_KEY, name).await?;
        kv.set(LOGIN_FLAG_KEY, "true").await?;
        tracing::info!(user_id = %user_id, "Signed in");
        Ok(())
    }

    async fn try_sign_out(&self) -> Result<(), StoreError> {
        let kv = self.store.backend();
        kv.remove(LOGIN_FLAG_KEY).await?;
        kv.remove(USER_EMAIL_KEY).await?;
        kv.remove(USER_ID_KEY).await?;
        tracing::info!("Signed out");
        Ok(())
    }
}
