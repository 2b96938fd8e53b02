//! SQLite connection pool and schema bootstrap.

use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};

use garage_core::ResourceDescriptor;

/// How long a writer waits on a locked database before failing.
pub const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Open (or create) the database file at `path`.
///
/// The file is switched to WAL journaling so readers never block the
/// single writer.
pub async fn connect(path: &Path) -> anyhow::Result<SqlitePool> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create database directory at {parent:?}"))?;
    }

    let options = SqliteConnectOptions::new()
        .filename(path)
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(BUSY_TIMEOUT);

    let pool = SqlitePoolOptions::new()
        .max_connections(8)
        .connect_with(options)
        .await
        .with_context(|| format!("failed to open SQLite database at {path:?}"))?;

    tracing::debug!(path = %path.display(), "sqlite pool ready");
    Ok(pool)
}

/// Private in-memory database (tests/dev).
///
/// Every connection to `:memory:` is its own database, so the pool is pinned
/// to a single connection that is never recycled.
pub async fn connect_in_memory() -> anyhow::Result<SqlitePool> {
    let options = SqliteConnectOptions::new().in_memory(true);

    SqlitePoolOptions::new()
        .min_connections(1)
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await
        .context("failed to open in-memory SQLite database")
}

/// Create the table of every resource if it does not exist yet.
pub async fn bootstrap(pool: &SqlitePool, resources: &[&ResourceDescriptor]) -> anyhow::Result<()> {
    for resource in resources {
        sqlx::query(&resource.create_table_sql())
            .execute(pool)
            .await
            .with_context(|| format!("failed to create {} table", resource.table))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use garage_inventory::CARS;
    use sqlx::Row;

    #[tokio::test]
    async fn bootstrap_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let pool = connect(&dir.path().join("banco.sqlite")).await.unwrap();

        bootstrap(&pool, &[&CARS]).await.unwrap();
        bootstrap(&pool, &[&CARS]).await.unwrap();

        let row = sqlx::query("SELECT COUNT(*) AS n FROM sqlite_master WHERE type = 'table' AND name = 'carros'")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(row.try_get::<i64, _>("n").unwrap(), 1);
    }

    #[tokio::test]
    async fn file_database_uses_wal() {
        let dir = tempfile::tempdir().unwrap();
        let pool = connect(&dir.path().join("nested").join("banco.sqlite")).await.unwrap();

        let row = sqlx::query("PRAGMA journal_mode").fetch_one(&pool).await.unwrap();
        let mode: String = row.try_get(0).unwrap();
        assert_eq!(mode.to_lowercase(), "wal");
    }
}
