//! `PostgreSQL` backend, reached through a connection string.

use async_trait::async_trait;
use sqlx::postgres::{PgConnectOptions, PgConnection};
use sqlx::{ConnectOptions, Connection};

use super::{MessageStore, NewMessage, StorageError};

const BACKEND: &str = "postgres";

const CREATE_MESSAGES: &str = r"
    CREATE TABLE IF NOT EXISTS messages (
        id SERIAL PRIMARY KEY,
        name TEXT NOT NULL,
        email TEXT NOT NULL,
        message TEXT NOT NULL,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
";

const INSERT_MESSAGE: &str = "INSERT INTO messages (name, email, message) VALUES ($1, $2, $3)";

/// Messages stored in a networked `PostgreSQL` database.
pub struct PostgresStore {
    url: String,
}

impl PostgresStore {
    pub fn new(url: &str) -> Self {
        Self {
            url: url.to_string(),
        }
    }

    /// Open a fresh connection; a malformed URL is reported as a connect failure.
    async fn connect(&self) -> Result<PgConnection, StorageError> {
        let options: PgConnectOptions = self.url.parse().map_err(connect_error)?;
        options.connect().await.map_err(connect_error)
    }
}

const fn connect_error(source: sqlx::Error) -> StorageError {
    StorageError::Connect {
        backend: BACKEND,
        source,
    }
}

// Keep credentials out of logs
impl std::fmt::Debug for PostgresStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PostgresStore").finish_non_exhaustive()
    }
}

#[async_trait]
impl MessageStore for PostgresStore {
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
