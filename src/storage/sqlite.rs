//! `SQLite` file backend.

use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqliteConnection};
use sqlx::{ConnectOptions, Connection};
use std::path::{Path, PathBuf};

use super::{MessageStore, NewMessage, StorageError};
use crate::logger;

const BACKEND: &str = "sqlite";

const CREATE_MESSAGES: &str = r"
    CREATE TABLE IF NOT EXISTS messages (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        email TEXT NOT NULL,
        message TEXT NOT NULL,
        created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
    )
";

const INSERT_MESSAGE: &str = "INSERT INTO messages (name, email, message) VALUES (?, ?, ?)";

/// Messages stored in a single local database file.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    path: PathBuf,
}

impl SqliteStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Open a fresh connection, creating the file (and its directory) if needed.
    async fn connect(&self) -> Result<SqliteConnection, StorageError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                if let Err(e) = std::fs::create_dir_all(parent) {
                    logger::log_warning(&format!(
                        "Failed to create database directory {}: {e}",
                        parent.display()
                    ));
                }
            }
        }

        SqliteConnectOptions::new()
            .filename(&self.path)
            .create_if_missing(true)
            .connect()
            .await
            .map_err(|source| StorageError::Connect {
                backend: BACKEND,
                source,
            })
    }
}

#[async_trait]
impl MessageStore for SqliteStore {
    fn backend(&self) -> &'static str {
        BACKEND
    }

    async fn ensure_schema(&self) -> Result<(), StorageError> {
        let mut conn = self.connect().await?;
        sqlx::query(CREATE_MESSAGES).execute(&mut conn).await?;
        conn.close().await?;
        Ok(())
    }

    async fn insert(&self, message: &NewMessage) -> Result<(), StorageError> {
        let mut conn = self.connect().await?;
        sqlx::query(INSERT_MESSAGE)
            .bind(&message.name)
            .bind(&message.email)
            .bind(&message.message)
            .execute(&mut conn)
            .await?;
        conn.close().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type Row = (i64, String, String, String, i64);

    fn sample() -> NewMessage {
        NewMessage {
            name: "Ann".to_string(),
            email: "ann@x.com".to_string(),
            message: "Hi".to_string(),
        }
    }

    async fn open(path: &Path) -> SqliteConnection {
        SqliteConnectOptions::new()
            .filename(path)
            .connect()
            .await
            .unwrap()
    }

    async fn rows(path: &Path) -> Vec<Row> {
        let mut conn = open(path).await;
        sqlx::query_as(
            "SELECT id, name, email, message, created_at IS NOT NULL FROM messages ORDER BY id",
        )
        .fetch_all(&mut conn)
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn test_ensure_schema_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("site.db");
        let store = SqliteStore::new(&path);

        for _ in 0..3 {
            store.ensure_schema().await.unwrap();
        }

        let mut conn = open(&path).await;
        let tables: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'messages'",
        )
        .fetch_one(&mut conn)
        .await
        .unwrap();
        assert_eq!(tables, 1);

        let columns: Vec<String> =
            sqlx::query_scalar("SELECT name FROM pragma_table_info('messages') ORDER BY cid")
                .fetch_all(&mut conn)
                .await
                .unwrap();
        assert_eq!(columns, ["id", "name", "email", "message", "created_at"]);
    }

    #[tokio::test]
    async fn test_insert_writes_exact_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("site.db");
        let store = SqliteStore::new(&path);
        store.ensure_schema().await.unwrap();

        store.insert(&sample()).await.unwrap();

        let rows = rows(&path).await;
        assert_eq!(rows.len(), 1);
        let (id, name, email, message, has_timestamp) = &rows[0];
        assert_eq!(*id, 1);
        assert_eq!(name, "Ann");
        assert_eq!(email, "ann@x.com");
        assert_eq!(message, "Hi");
        assert_eq!(*has_timestamp, 1);
    }

    #[tokio::test]
    async fn test_duplicate_submissions_get_distinct_ids() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("site.db");
        let store = SqliteStore::new(&path);
        store.ensure_schema().await.unwrap();

        store.insert(&sample()).await.unwrap();
        store.insert(&sample()).await.unwrap();

        let rows = rows(&path).await;
        assert_eq!(rows.len(), 2);
        assert_ne!(rows[0].0, rows[1].0);
    }

    #[tokio::test]
    async fn test_creates_missing_parent_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data").join("nested").join("site.db");
        let store = SqliteStore::new(&path);

        store.ensure_schema().await.unwrap();
        assert!(path.exists());
    }

    #[tokio::test]
    async fn test_insert_without_schema_fails() {
        let dir = tempfile::tempdir().unwrap();
        let store = SqliteStore::new(dir.path().join("site.db"));

        let err = store.insert(&sample()).await.unwrap_err();
        assert!(matches!(err, StorageError::Query(_)));
        assert!(err.to_string().contains("no such table"));
    }
}
