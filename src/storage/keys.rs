//! Fixed storage key names.
//!
//! These must match the mobile client byte-for-byte so that data it already
//! persisted stays readable. Per-user keys get a `:<userId>` suffix through
//! [`UserScope`](super::UserScope); global keys are used as-is.

pub const BOOKMARKS_KEY: &str = "@SummaNews:bookmarks";
pub const SEARCH_HISTORY_KEY: &str = "@SummaNews:searchHistory";
pub const NOTIFICATION_SETTINGS_KEY: &str = "@SummaNews:notifications";
pub const USER_STATS_KEY: &str = "@SummaNews:userStats";
// Device-wide: the client writes these without a user suffix.
pub const SELECTED_CATEGORIES_KEY: &str = "selectedCategories";
pub const NOTIFICATION_HISTORY_KEY: &str = "notificationHistory";
pub const NOTIFICATION_SCHEDULE_KEY: &str = "notificationSchedule";

pub const LOGIN_FLAG_KEY: &str = "isLoggedIn";
pub const USER_EMAIL_KEY: &str = "userEmail";
pub const USER_NAME_KEY: &str = "userName";
pub const USER_ID_KEY: &str = "userId";

/// Every key namespaced per user.
pub const PER_USER_KEYS: [&str; 4] = [
    BOOKMARKS_KEY,
    SEARCH_HISTORY_KEY,
    NOTIFICATION_SETTINGS_KEY,
    USER_STATS_KEY,
];

/// Unscoped preference keys shared by everyone on the device.
pub const DEVICE_KEYS: [&str; 3] = [
    SELECTED_CATEGORIES_KEY,
    NOTIFICATION_HISTORY_KEY,
    NOTIFICATION_SCHEDULE_KEY,
];

/// Global session keys removed by a full reset.
pub const GLOBAL_SESSION_KEYS: [&str; 4] =
    [USER_NAME_KEY, USER_EMAIL_KEY, LOGIN_FLAG_KEY, USER_ID_KEY];
