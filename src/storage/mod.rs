//! Message storage module
//!
//! Contact messages are written to one of two interchangeable backends:
//! - `SQLite` file (local development, no server process)
//! - `PostgreSQL` reached through a connection string (deployment)
//!
//! The backend is chosen once at startup by [`select`] and shared as an
//! `Arc<dyn MessageStore>`. Every operation opens its own connection, runs one
//! statement and closes it again; nothing is pooled or retried.

mod postgres;
mod sqlite;

pub use postgres::PostgresStore;
pub use sqlite::SqliteStore;

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

use crate::config::StorageConfig;

/// Storage errors.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("failed to connect to {backend}: {source}")]
    Connect {
        backend: &'static str,
        #[source]
        source: sqlx::Error,
    },
    #[error("{0}")]
    Query(#[from] sqlx::Error),
}

/// A validated contact submission, ready to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMessage {
    pub name: String,
    pub email: String,
    pub message: String,
}

/// Write-only store for contact messages.
#[async_trait]
pub trait MessageStore: Send + Sync {
    /// Short backend name for logs (`sqlite` or `postgres`)
    fn backend(&self) -> &'static str;

    /// Create the `messages` table if it does not exist yet.
    ///
    /// Safe to call on every start.
    async fn ensure_schema(&self) -> Result<(), StorageError>;

    /// Insert one row; id and `created_at` are assigned by the database.
    async fn insert(&self, message: &NewMessage) -> Result<(), StorageError>;
}

/// Pick the backend for the lifetime of the process.
///
/// A configured `database_url` always wins, even if that database later turns
/// out to be unreachable: inserts then fail instead of landing in the file.
pub fn select(config: &StorageConfig) -> Arc<dyn MessageStore> {
    match config.database_url.as_deref() {
        Some(url) => Arc::new(PostgresStore::new(url)),
        None => Arc::new(SqliteStore::new(&config.sqlite_path)),
    }
}
