//! Local persistence layer of the SummaNews reader.
//!
//! Bookmarks, search history, notification settings and reading stats are
//! kept as JSON blobs in a string-keyed store, namespaced per signed-in user.
//! Start from [`storage::LocalStore`].

pub mod config;
pub mod storage;
pub mod util;
