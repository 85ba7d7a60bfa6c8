use anyhow::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;

use crate::config::StorageConfig;

/// Open the collection database, creating the file and its parent
/// directory on first use.
pub async fn connect(storage: &StorageConfig) -> Result<SqlitePool> {
    if let Some(parent) = storage.db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let options =
        SqliteConnectOptions::from_str(&format!("sqlite:{}", storage.db_path.display()))?
            .create_if_missing(true)
            .foreign_keys(true)
            .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal);

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    Ok(pool)
}
