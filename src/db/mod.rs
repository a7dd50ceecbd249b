//! Connection handle and per-table finders.
//!
//! `QuestionsDatabase` owns the single store connection. Each submodule adds
//! the finders and relationship accessors for one record type in
//! `crate::model` as inherent methods taking `&QuestionsDatabase`.

mod question_follows;
mod question_likes;
mod questions;
mod replies;
mod users;

use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use tracing::{debug, info, instrument};

use crate::config::DatabaseConfig;
use crate::error::{Result, StoreError};

pub type Pool = SqlitePool;

/// Store location used when nothing else is configured.
pub const DEFAULT_DATABASE_URL: &str = "sqlite://questions.db";

/// Explicitly passed handle to the forum store.
///
/// Backed by a pool capped at one connection that is never reaped, so the
/// handle keeps exactly one live connection until [`close`](Self::close) and
/// concurrent callers are serialised on it. Cloning shares that connection.
#[derive(Debug, Clone)]
pub struct QuestionsDatabase {
    pool: Pool,
}

impl QuestionsDatabase {
    /// Open an existing store. A missing file is reported as unavailable.
    pub async fn connect(database_url: &str) -> Result<Self> {
        Self::open(database_url, false).await
    }

    pub async fn open_default() -> Result<Self> {
        Self::connect(DEFAULT_DATABASE_URL).await
    }

    pub async fn from_config(cfg: &DatabaseConfig) -> Result<Self> {
        let db = Self::open(&cfg.url, cfg.create_if_missing).await?;
        if cfg.bootstrap_schema {
            db.bootstrap_schema().await?;
        }
        Ok(db)
    }

    #[instrument(skip_all, fields(url = database_url))]
    async fn open(database_url: &str, create_if_missing: bool) -> Result<Self> {
        let expanded = expand_home(database_url);
        let options = SqliteConnectOptions::from_str(&expanded)
            .map_err(StoreError::Unavailable)?
            .create_if_missing(create_if_missing)
            .foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None::<Duration>)
            .max_lifetime(None::<Duration>)
            .connect_with(options)
            .await
            .map_err(StoreError::Unavailable)?;
        info!("opened forum store");
        Ok(Self { pool })
    }

    /// Apply the bundled schema. Every statement is idempotent, so running it
    /// against a store that already has the tables is a no-op.
    pub async fn bootstrap_schema(&self) -> Result<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        debug!("forum schema applied");
        Ok(())
    }

    pub fn pool(&self) -> &Pool {
        &self.pool
    }

    /// Release the connection. Other clones of this handle stop working too.
    pub async fn close(self) {
        self.pool.close().await;
        info!("closed forum store");
    }
}

/// Expand a leading `~/` in a file-backed SQLite URL against `$HOME`.
/// In-memory and other URLs are returned unchanged.
fn expand_home(url: &str) -> String {
    let Some(rest) = url.strip_prefix("sqlite:") else {
        return url.to_string();
    };
    let (slashes, path) = match rest.strip_prefix("//") {
        Some(path) => ("//", path),
        None => ("", rest),
    };
    let Some(tail) = path.strip_prefix("~/") else {
        return url.to_string();
    };
    match std::env::var("HOME") {
        Ok(home) => format!("sqlite:{slashes}{}/{tail}", home.trim_end_matches('/')),
        Err(_) => url.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn expand_home_leaves_plain_urls() {
        assert_eq!(expand_home("sqlite::memory:"), "sqlite::memory:");
        assert_eq!(
            expand_home("sqlite://data/questions.db"),
            "sqlite://data/questions.db"
        );
        assert_eq!(expand_home("questions.db"), "questions.db");
    }

    #[test]
    fn expand_home_rewrites_tilde() {
        let Ok(home) = std::env::var("HOME") else {
            return;
        };
        let home = home.trim_end_matches('/').to_string();
        assert_eq!(
            expand_home("sqlite://~/forum/questions.db"),
            format!("sqlite://{home}/forum/questions.db")
        );
        assert_eq!(
            expand_home("sqlite:~/questions.db?mode=ro"),
            format!("sqlite:{home}/questions.db?mode=ro")
        );
    }

    #[tokio::test]
    async fn missing_file_is_unavailable() {
        let td = tempdir().unwrap();
        let url = format!("sqlite://{}", td.path().join("absent.db").display());
        let err = QuestionsDatabase::connect(&url).await.unwrap_err();
        assert!(matches!(err, StoreError::Unavailable(_)), "got {err:?}");
    }

    #[tokio::test]
    async fn from_config_creates_and_bootstraps() {
        let td = tempdir().unwrap();
        let path = td.path().join("forum.db");
        let cfg = DatabaseConfig {
            url: format!("sqlite://{}", path.display()),
            create_if_missing: true,
            bootstrap_schema: true,
        };
        let db = QuestionsDatabase::from_config(&cfg).await.unwrap();
        let tables: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' \
             AND name IN ('users', 'questions', 'replies', 'question_follows', 'question_likes')",
        )
        .fetch_one(db.pool())
        .await
        .unwrap();
        assert_eq!(tables, 5);
        db.close().await;
        assert!(path.exists());

        // Reopening an existing file needs no create flag.
        let db = QuestionsDatabase::connect(&cfg.url).await.unwrap();
        db.bootstrap_schema().await.unwrap();
        db.close().await;
    }

    #[tokio::test]
    async fn query_against_missing_table_is_malformed() {
        let db = QuestionsDatabase::connect("sqlite::memory:").await.unwrap();
        let err = crate::model::User::find_by_id(&db, 1).await.unwrap_err();
        assert!(matches!(err, StoreError::MalformedQuery(_)), "got {err:?}");
    }
}
