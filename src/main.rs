use anyhow::{Context, Result};
use chrono::{Local, NaiveTime};
use clap::Parser;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;

mod cli;

use cli::{
    ArticleArgs, BookmarksCmd, CategoriesCmd, Command, HistoryCmd, NotificationsCmd, Opts,
    ScheduleCmd, SessionCmd, SettingsCmd, StatsCmd,
};
use summanews_store::config::Config;
use summanews_store::storage::{
    Article, Database, FixedSession, LocalStore, NotificationSchedule, SessionProvider,
    StoreError, StoredSession,
};
use summanews_store::util::stable_article_id;

/// Get the config directory path (~/.config/summanews/)
fn get_config_dir() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME environment variable not set")?;
    Ok(PathBuf::from(home).join(".config").join("summanews"))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn parse_daily_time(time: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(time.trim(), "%H:%M")
        .with_context(|| format!("Invalid time '{}': expected HH:MM", time))
}

impl From<ArticleArgs> for Article {
    fn from(args: ArticleArgs) -> Self {
        Article {
            id: stable_article_id(&args.title, &args.url, &args.category),
            original_url: Some(args.url),
            category: args.category,
            title: args.title,
            subtitle: args.subtitle,
            summary: args.summary,
            date: args.date,
            source: args.source,
            image: args.image,
            read_time: args.read_time,
            trend_rank: args.trend_rank,
            is_bookmarked: false,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let opts = Opts::parse();

    let config_dir = get_config_dir()?;
    if !config_dir.exists() {
        std::fs::create_dir_all(&config_dir).context("Failed to create config directory")?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            if let Err(e) =
                std::fs::set_permissions(&config_dir, std::fs::Permissions::from_mode(0o700))
            {
                tracing::warn!(
                    path = %config_dir.display(),
                    error = %e,
                    "Failed to set config directory permissions to 0700"
                );
            }
        }
    }

    let config_path = opts
        .global
        .config
        .clone()
        .unwrap_or_else(|| config_dir.join("config.toml"));
    let config = Config::load(&config_path).context("Failed to load configuration")?;

    let db_path = opts
        .global
        .db
        .clone()
        .unwrap_or_else(|| config.database_path_in(&config_dir));

    if opts.global.reset_db && db_path.exists() {
        std::fs::remove_file(&db_path).context("Failed to delete database")?;
        eprintln!("Database reset.");
    }

    let db_path_str = db_path
        .to_str()
        .ok_or_else(|| anyhow::anyhow!("Invalid UTF-8 in database path"))?;
    let db = match Database::open(db_path_str).await {
        Ok(db) => Arc::new(db),
        Err(StoreError::InstanceLocked) => {
            eprintln!(
                "Error: Another instance of summanews appears to be running. Please close it and try again."
            );
            std::process::exit(1);
        }
        Err(e) => {
            return Err(anyhow::anyhow!("Failed to open database: {}", e));
        }
    };

    let session: Arc<dyn SessionProvider> = match opts.global.user.clone().or(config.user_id.clone()) {
        Some(user_id) => Arc::new(FixedSession::user(user_id)),
        None => Arc::new(StoredSession::new(db.clone())),
    };
    let mut store = LocalStore::new(db.clone(), session);
    if !config.serialize_writes {
        store = store.without_write_serialization();
    }

    run(opts.cmd, &store, &db).await
}

/// The store never derives the scrap counter itself; every bookmark change
/// made here is followed by a resync.
async fn recompute_scrap_count(store: &LocalStore) -> Result<()> {
    if !store.user_stats().recompute_scrap_count().await {
        anyhow::bail!("Failed to update scrap count");
    }
    Ok(())
}

async fn run(cmd: Command, store: &LocalStore, db: &Database) -> Result<()> {
    match cmd {
        Command::Bookmarks(cmd) => match cmd {
            BookmarksCmd::List => print_json(&store.bookmarks().list().await)?,
            BookmarksCmd::Add(args) => {
                let article = Article::from(args);
                let added = store.bookmarks().add(&article).await;
                if !added && !store.bookmarks().is_bookmarked(&article.id).await {
                    anyhow::bail!("Failed to bookmark {}", article.id);
                }
                recompute_scrap_count(store).await?;
                if added {
                    println!("Bookmarked {}", article.id);
                } else {
                    println!("Already bookmarked: {}", article.id);
                }
            }
            BookmarksCmd::Remove { id } => {
                if !store.bookmarks().remove(&id).await {
                    anyhow::bail!("Failed to remove bookmark {}", id);
                }
                recompute_scrap_count(store).await?;
                println!("Removed {}", id);
            }
            BookmarksCmd::Check { id } => {
                if store.bookmarks().is_bookmarked(&id).await {
                    println!("{} is bookmarked", id);
                } else {
                    println!("{} is not bookmarked", id);
                    std::process::exit(1);
                }
            }
        },

        Command::History(cmd) => match cmd {
            HistoryCmd::List => {
                for query in store.search_history().list().await {
                    println!("{}", query);
                }
            }
            HistoryCmd::Record { query } => store.search_history().record(&query).await,
            HistoryCmd::Clear => store.search_history().clear().await,
        },

        Command::Settings(cmd) => match cmd {
            SettingsCmd::Show => print_json(&store.notification_settings().get().await)?,
            SettingsCmd::Set {
                enabled,
                time,
                frequency,
                categories,
            } => {
                let mut settings = store.notification_settings().get().await;
                if let Some(enabled) = enabled {
                    settings.enabled = enabled;
                }
                if let Some(time) = time {
                    let parsed = parse_daily_time(&time)?;
                    settings.daily_news_time = Some(parsed.format("%H:%M").to_string());
                }
                if let Some(frequency) = frequency {
                    settings.frequency = frequency;
                }
                if !categories.is_empty() {
                    settings.categories = categories;
                }
                if !store.notification_settings().save(&settings).await {
                    anyhow::bail!("Failed to save notification settings");
                }
                print_json(&settings)?;
            }
        },

        Command::Stats(cmd) => {
            match cmd {
                StatsCmd::Show => {}
                StatsCmd::Read => {
                    if !store.user_stats().increment_read_articles().await {
                        anyhow::bail!("Failed to update reading stats");
                    }
                }
                StatsCmd::Recompute => recompute_scrap_count(store).await?,
            }
            print_json(&store.user_stats().get().await)?;
        }

        Command::Categories(cmd) => match cmd {
            CategoriesCmd::Show => print_json(&store.categories().get().await)?,
            CategoriesCmd::Set { categories } => {
                if !store.categories().save(&categories).await {
                    anyhow::bail!("Failed to save categories");
                }
                print_json(&store.categories().get().await)?;
            }
        },

        Command::Notifications(cmd) => match cmd {
            NotificationsCmd::List => print_json(&store.notification_history().list().await)?,
            NotificationsCmd::Push { title, body } => {
                match store.notification_history().push(&title, &body).await {
                    Some(record) => print_json(&record)?,
                    None => anyhow::bail!("Failed to record notification"),
                }
            }
            NotificationsCmd::Read { id } => {
                if !store.notification_history().mark_read(&id).await {
                    anyhow::bail!("No notification with id {}", id);
                }
            }
            NotificationsCmd::Clear => store.notification_history().clear().await,
        },

        Command::Schedule(cmd) => {
            let schedule = match cmd {
                ScheduleCmd::Show => store.notification_schedule().get().await,
                ScheduleCmd::Set { time, disabled } => {
                    let schedule =
                        NotificationSchedule::from_daily_time(parse_daily_time(&time)?, !disabled);
                    if !store.notification_schedule().save(&schedule).await {
                        anyhow::bail!("Failed to save notification schedule");
                    }
                    Some(schedule)
                }
            };
            match schedule {
                Some(schedule) => {
                    print_json(&schedule)?;
                    if schedule.enabled {
                        if let Some(next) = schedule.next_fire_after(Local::now().naive_local()) {
                            println!("Next notification: {}", next.format("%Y-%m-%d %H:%M"));
                        }
                    }
                }
                None => println!("No notification schedule set"),
            }
        }

        Command::Session(cmd) => match cmd {
            SessionCmd::Show => {
                let session = store.session();
                println!("logged in: {}", session.is_logged_in().await);
                println!("user id:   {}", session.user_id().await.unwrap_or_default());
                println!("email:     {}", session.user_email().await.unwrap_or_default());
                println!("name:      {}", session.user_name().await.unwrap_or_default());
                println!(
                    "namespace: {}",
                    store.scope().user_id().await.as_deref().unwrap_or("<global>")
                );
            }
            SessionCmd::SignIn {
                user_id,
                email,
                name,
            } => {
                if !store.session().sign_in(&user_id, &email, &name).await {
                    anyhow::bail!("Failed to store session");
                }
            }
            SessionCmd::SignOut => {
                if !store.session().sign_out().await {
                    anyhow::bail!("Failed to clear session");
                }
            }
        },

        Command::Reset => {
            store.clear_all().await;
            println!("User data cleared.");
        }

        Command::Dump { prefix } => {
            let entries = db
                .entries_with_prefix(&prefix)
                .await
                .context("Failed to read entries")?;
            for (key, value) in entries {
                println!("{}\t{}", key, value);
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn test_store() -> (Arc<Database>, LocalStore) {
        let db = Arc::new(Database::open(":memory:").await.unwrap());
        let store = LocalStore::new(db.clone(), Arc::new(FixedSession::user("cli")));
        (db, store)
    }

    fn add_cmd(title: &str) -> Command {
        Command::Bookmarks(BookmarksCmd::Add(ArticleArgs {
            title: title.to_string(),
            url: format!("https://example.com/{}", title),
            category: "경제".to_string(),
            subtitle: String::new(),
            summary: None,
            date: String::new(),
            source: String::new(),
            image: String::new(),
            read_time: Some("3분".to_string()),
            trend_rank: None,
        }))
    }

    #[tokio::test]
    async fn test_bookmark_commands_keep_scrap_count_in_sync() {
        let (db, store) = test_store().await;

        run(add_cmd("first"), &store, &db).await.unwrap();
        run(add_cmd("second"), &store, &db).await.unwrap();
        run(add_cmd("second"), &store, &db).await.unwrap();
        assert_eq!(store.user_stats().get().await.scrap_articles, 2);

        let id = stable_article_id("first", "https://example.com/first", "경제");
        run(Command::Bookmarks(BookmarksCmd::Remove { id }), &store, &db)
            .await
            .unwrap();
        assert_eq!(store.user_stats().get().await.scrap_articles, 1);

        let saved = store.bookmarks().list().await;
        assert_eq!(saved[0].read_time.as_deref(), Some("3분"));
    }
}
