mod backend;
mod bookmarks;
mod categories;
mod codec;
mod key_value;
pub mod keys;
mod locks;
mod notification_history;
mod notification_settings;
mod reset;
mod schedule;
mod schema;
mod scope;
mod search_history;
mod session;
mod store;
mod types;
mod user_stats;

pub use backend::{KeyValueStore, MemoryStore};
pub use bookmarks::BookmarkStore;
pub use categories::CategoryStore;
pub use codec::{decode, decode_or_default, encode};
pub use locks::KeyLocks;
pub use notification_history::NotificationHistoryStore;
pub use notification_settings::NotificationSettingsStore;
pub use schedule::{Meridiem, NotificationSchedule, ScheduleStore};
pub use schema::Database;
pub use scope::{scoped_key, FixedSession, SessionProvider, StoredSession, UserScope};
pub use search_history::{SearchHistoryStore, MAX_SEARCH_HISTORY};
pub use session::SessionStore;
pub use store::LocalStore;
pub use user_stats::UserStatsStore;
pub use types::{
    Article, Frequency, NotificationRecord, NotificationSettings, StoreError, UnknownFrequency,
    UserStats,
};
