//! Utility functions shared by the store and the CLI.
//!
//! - **Article ids**: the stable `news_<hash>` identifier the mobile client
//!   derives from title, URL and category

mod article_id;

pub use article_id::stable_article_id;
