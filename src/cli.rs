use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use summanews_store::storage::Frequency;

#[derive(Parser, Debug)]
#[command(
    name = "summanews",
    version,
    about = "Inspect and edit the SummaNews local store"
)]
pub struct Opts {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Args, Debug)]
pub struct GlobalOpts {
    /// Config file (default: ~/.config/summanews/config.toml)
    #[arg(long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Database file (overrides config)
    #[arg(long, value_name = "FILE", global = true)]
    pub db: Option<PathBuf>,

    /// Act as this user instead of the stored session
    #[arg(long, value_name = "ID", global = true)]
    pub user: Option<String>,

    /// Delete and recreate the database before running the command
    #[arg(long, global = true)]
    pub reset_db: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Bookmarked articles
    #[command(subcommand)]
    Bookmarks(BookmarksCmd),

    /// Search history
    #[command(subcommand)]
    History(HistoryCmd),

    /// Notification settings
    #[command(subcommand)]
    Settings(SettingsCmd),

    /// Reading statistics
    #[command(subcommand)]
    Stats(StatsCmd),

    /// Followed categories
    #[command(subcommand)]
    Categories(CategoriesCmd),

    /// Notification inbox
    #[command(subcommand)]
    Notifications(NotificationsCmd),

    /// Daily notification alarm
    #[command(subcommand)]
    Schedule(ScheduleCmd),

    /// Signed-in identity
    #[command(subcommand)]
    Session(SessionCmd),

    /// Delete all data of the current user and the session keys
    Reset,

    /// Print raw stored entries whose key starts with PREFIX
    Dump {
        #[arg(default_value = "")]
        prefix: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum BookmarksCmd {
    List,
    /// Bookmark an article and resync the scrap counter
    Add(ArticleArgs),
    /// Remove a bookmark and resync the scrap counter
    Remove { id: String },
    /// Exit status 0 if bookmarked, 1 otherwise
    Check { id: String },
}

#[derive(Args, Debug)]
pub struct ArticleArgs {
    #[arg(long)]
    pub title: String,
    #[arg(long)]
    pub url: String,
    #[arg(long)]
    pub category: String,
    #[arg(long, default_value = "")]
    pub subtitle: String,
    #[arg(long)]
    pub summary: Option<String>,
    #[arg(long, default_value = "")]
    pub date: String,
    #[arg(long, default_value = "")]
    pub source: String,
    #[arg(long, default_value = "")]
    pub image: String,
    /// Display reading time, e.g. "3분"
    #[arg(long)]
    pub read_time: Option<String>,
    #[arg(long)]
    pub trend_rank: Option<u32>,
}

#[derive(Subcommand, Debug)]
pub enum HistoryCmd {
    List,
    Record { query: String },
    Clear,
}

#[derive(Subcommand, Debug)]
pub enum SettingsCmd {
    Show,
    /// Update the given fields and save the whole record
    Set {
        #[arg(long)]
        enabled: Option<bool>,
        /// Daily time as HH:MM
        #[arg(long)]
        time: Option<String>,
        #[arg(long)]
        frequency: Option<Frequency>,
        /// Replace the category list (repeatable)
        #[arg(long = "category")]
        categories: Vec<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum StatsCmd {
    Show,
    /// Count one article read
    Read,
    /// Resync the scrap counter with the bookmark list
    Recompute,
}

#[derive(Subcommand, Debug)]
pub enum CategoriesCmd {
    Show,
    Set { categories: Vec<String> },
}

#[derive(Subcommand, Debug)]
pub enum NotificationsCmd {
    List,
    Push { title: String, body: String },
    Read { id: String },
    Clear,
}

#[derive(Subcommand, Debug)]
pub enum ScheduleCmd {
    Show,
    Set {
        /// Time as HH:MM (24-hour)
        time: String,
        #[arg(long)]
        disabled: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum SessionCmd {
    Show,
    SignIn {
        user_id: String,
        email: String,
        name: String,
    },
    SignOut,
}
