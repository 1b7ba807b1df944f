use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// Error Types
// ============================================================================

/// Errors raised by key-value backends and record encoding.
///
/// These never cross the public store operations (which are fail-soft);
/// they surface only from [`KeyValueStore`](super::KeyValueStore)
/// implementations and from [`Database::open`](super::Database::open).
#[derive(Debug, Error)]
pub enum StoreError {
    /// Another process holds the SQLite database lock
    #[error("Another instance of summanews appears to be running. Please close it and try again.")]
    InstanceLocked,

    /// Migration failed
    #[error("Database migration failed: {0}")]
    Migration(String),

    /// Backend rejected a read or write
    #[error("Storage backend error: {0}")]
    Backend(#[from] sqlx::Error),

    /// Backend is not reachable (used by non-SQL backends)
    #[error("Storage backend unavailable: {0}")]
    Unavailable(String),

    /// A record could not be serialized to JSON
    #[error("Failed to encode record: {0}")]
    Encode(#[from] serde_json::Error),
}

impl StoreError {
    /// Classify a sqlx error, mapping lock-related failures to `InstanceLocked`.
    pub(crate) fn from_sqlx(err: sqlx::Error) -> Self {
        let error_string = err.to_string().to_lowercase();

        // SQLITE_BUSY (5), SQLITE_LOCKED (6), SQLITE_CANTOPEN (14)
        if error_string.contains("database is locked")
            || error_string.contains("database table is locked")
            || error_string.contains("sqlite_busy")
            || error_string.contains("sqlite_locked")
            || error_string.contains("unable to open database file")
        {
            return StoreError::InstanceLocked;
        }

        StoreError::Backend(err)
    }
}

// ============================================================================
// Article
// ============================================================================

/// A news article as persisted in the bookmark list.
///
/// Field names follow the JSON layout the mobile client already writes
/// (`camelCase`, except `trend_rank`), so existing records decode as-is.
/// The client copies fields straight from the news API, so any of them may
/// be `null` or missing; those read as empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    /// Stable identifier, see [`stable_article_id`](crate::util::stable_article_id).
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub category: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub subtitle: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    /// Publication date as displayed by the source (free-form).
    #[serde(default, deserialize_with = "null_as_default")]
    pub date: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub source: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub image: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub read_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_url: Option<String>,
    #[serde(
        rename = "trend_rank",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub trend_rank: Option<u32>,
    /// Forced to `true` when the article enters the bookmark list.
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_bookmarked: bool,
}

/// Deserialize `null` as `T::default()`.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

// ============================================================================
// Notification Settings
// ============================================================================

/// How often the user wants news notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Immediate,
    #[default]
    Daily,
    Weekly,
}

#[derive(Debug, Error)]
#[error("Unknown notification frequency '{0}' (expected immediate, daily or weekly)")]
pub struct UnknownFrequency(pub String);

impl FromStr for Frequency {
    type Err = UnknownFrequency;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "immediate" => Ok(Frequency::Immediate),
            "daily" => Ok(Frequency::Daily),
            "weekly" => Ok(Frequency::Weekly),
            _ => Err(UnknownFrequency(s.to_string())),
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Frequency::Immediate => "immediate",
            Frequency::Daily => "daily",
            Frequency::Weekly => "weekly",
        };
        f.write_str(name)
    }
}

/// The single notification settings record kept per user.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationSettings {
    pub enabled: bool,
    /// Daily delivery time as `HH:MM` (24-hour).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub daily_news_time: Option<String>,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub frequency: Frequency,
}

impl NotificationSettings {
    /// Parse `daily_news_time`; `None` when unset or not a valid `HH:MM`.
    pub fn daily_time(&self) -> Option<NaiveTime> {
        self.daily_news_time
            .as_deref()
            .and_then(|t| NaiveTime::parse_from_str(t.trim(), "%H:%M").ok())
    }
}

// ============================================================================
// User Stats
// ============================================================================

/// Running per-user counters shown on the profile screen.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserStats {
    pub read_articles: u64,
    /// Mirrors the bookmark list length after `recompute_scrap_count`.
    pub scrap_articles: u64,
    pub last_updated: Option<DateTime<Utc>>,
}

// ============================================================================
// Notification History
// ============================================================================

/// A delivered notification as shown in the in-app notification inbox.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationRecord {
    /// Millisecond timestamp at creation, rendered as a string.
    pub id: String,
    pub title: String,
    pub body: String,
    /// RFC 3339 creation time.
    pub timestamp: String,
    #[serde(default)]
    pub read: bool,
}
