use std::str::FromStr;
use std::time::Duration;

use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use tracing::info;

use crate::error::{StoreError, StoreResult};

/// Opens the SQLite file behind `database_url`, creating it when missing, and
/// brings the schema up to date.
pub async fn connect(database_url: &str) -> StoreResult<SqlitePool> {
    if !database_url.starts_with("sqlite:") {
        return Err(StoreError::Config(format!(
            "{database_url} (expected a sqlite:// url)"
        )));
    }

    let options = SqliteConnectOptions::from_str(database_url)
        .map_err(|e| StoreError::Config(e.to_string()))?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .foreign_keys(true)
        .busy_timeout(Duration::from_secs(10));

    let pool = SqlitePoolOptions::new()
        .max_connections(20)
        .connect_with(options)
        .await?;

    migrate(&pool).await?;
    info!(url = %database_url, "Database ready");

    Ok(pool)
}

/// Single-connection in-memory database, used by tests and throwaway runs.
pub async fn connect_in_memory() -> StoreResult<SqlitePool> {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")
        .map_err(|e| StoreError::Config(e.to_string()))?
        .foreign_keys(true);

    // Every connection to :memory: is a separate database.
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await?;

    migrate(&pool).await?;
    Ok(pool)
}

async fn migrate(pool: &SqlitePool) -> StoreResult<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn rejects_non_sqlite_urls() {
        let err = connect("postgres://localhost/iptv").await.unwrap_err();
        assert!(matches!(err, StoreError::Config(_)));
    }

    #[tokio::test]
    async fn migrations_are_idempotent() {
        let pool = connect_in_memory().await.unwrap();
        migrate(&pool).await.unwrap();

        let tables: Vec<(String,)> = sqlx::query_as(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%' AND name NOT LIKE '_sqlx%' ORDER BY name",
        )
        .fetch_all(&pool)
        .await
        .unwrap();
        let names: Vec<_> = tables.into_iter().map(|(n,)| n).collect();
        assert_eq!(
            names,
            ["channels", "episodes", "resellers", "series", "users", "vod"]
        );
    }
}
