use async_trait::async_trait;
use chrono::Utc;
use sqlx::migrate::Migrator;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;
use tracing::info;

use super::{ChatRecord, ChatUpdate, Storage};
use crate::config::DatabaseConfig;
use crate::error::{StorageError, StorageResult};

/// Static migrator that embeds migrations at compile time
static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// SQLite-backed chat history store
#[derive(Clone)]
pub struct SqliteStorage {
    pool: SqlitePool,
}

impl SqliteStorage {
    /// Create a new SQLite storage instance
    pub async fn new(config: &DatabaseConfig) -> StorageResult<Self> {
        // Ensure parent directory exists
        if let Some(parent) = config.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| StorageError::Connection {
                message: format!("Failed to create database directory: {}", e),
            })?;
        }

        let database_url = format!("sqlite://{}?mode=rwc", config.path.display());

        let options = SqliteConnectOptions::from_str(&database_url)
            .map_err(|e| StorageError::Connection {
                message: format!("Invalid database URL: {}", e),
            })?
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .connect_with(options)
            .await
            .map_err(|e| StorageError::Connection {
                message: format!("Failed to connect to database: {}", e),
            })?;

        let storage = Self { pool };
        storage.run_migrations().await?;

        Ok(storage)
    }

    /// Create an in-memory storage instance for testing
    pub async fn new_in_memory() -> StorageResult<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:").map_err(|e| {
            StorageError::Connection {
                message: format!("Invalid database URL: {}", e),
            }
        })?;

        // A single connection keeps every query on the same in-memory DB
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .map_err(|e| StorageError::Connection {
                message: format!("Failed to connect to in-memory database: {}", e),
            })?;

        let storage = Self { pool };
        storage.run_migrations().await?;

        Ok(storage)
    }

    /// Run database migrations using embedded sqlx migrations
    async fn run_migrations(&self) -> StorageResult<()> {
        info!("Running database migrations...");

        MIGRATOR
            .run(&self.pool)
            .await
            .map_err(|e| StorageError::Migration {
                message: format!("Failed to run migrations: {}", e),
            })?;

        info!("Database migrations completed successfully");
        Ok(())
    }

    /// Get the underlying pool for advanced queries
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl Storage for SqliteStorage {
    async fn create_chat(&self, chat: &ChatRecord) -> StorageResult<()> {
        sqlx::query(
            r#"
            INSERT INTO chats (id, title, question, answer, pinned, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&chat.id)
        .bind(&chat.title)
        .bind(&chat.question)
        .bind(&chat.answer)
        .bind(chat.pinned)
        .bind(chat.created_at.to_rfc3339())
        .bind(chat.updated_at.to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn get_chat(&self, id: &str) -> StorageResult<Option<ChatRecord>> {
        let row: Option<ChatRow> = sqlx::query_as(
            r#"
            SELECT id, title, question, answer, pinned, created_at, updated_at
            FROM chats
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(ChatRecord::try_from).transpose()
    }

    async fn get_all_chats(&self) -> StorageResult<Vec<ChatRecord>> {
        // Recency first; id as a stable tiebreak for equal timestamps
        let rows: Vec<ChatRow> = sqlx::query_as(
            r#"
            SELECT id, title, question, answer, pinned, created_at, updated_at
            FROM chats
            ORDER BY updated_at DESC, id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(ChatRecord::try_from).collect()
    }

    async fn update_chat(&self, id: &str, update: &ChatUpdate) -> StorageResult<()> {
        // Title is the only mutable field today; COALESCE leaves it
        // untouched when the update does not carry one.
        let result = sqlx::query(
            r#"
            UPDATE chats
            SET title = COALESCE(?, title), updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&update.title)
        .bind(Utc::now().to_rfc3339())
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::ChatNotFound {
                chat_id: id.to_string(),
            });
        }

        Ok(())
    }

    async fn toggle_pin(&self, id: &str) -> StorageResult<bool> {
        // RETURNING makes the flip-and-read a single statement, so the
        // reported value is always the one this call wrote.
        let row: Option<(bool,)> = sqlx::query_as(
            r#"
            UPDATE chats
            SET pinned = NOT pinned, updated_at = ?
            WHERE id = ?
            RETURNING pinned
            "#,
        )
        .bind(Utc::now().to_rfc3339())
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some((pinned,)) => Ok(pinned),
            None => Err(StorageError::ChatNotFound {
                chat_id: id.to_string(),
            }),
        }
    }

    async fn delete_chat(&self, id: &str) -> StorageResult<()> {
        let result = sqlx::query("DELETE FROM chats WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::ChatNotFound {
                chat_id: id.to_string(),
            });
        }

        Ok(())
    }
}

// Internal row type for SQLx mapping
#[derive(sqlx::FromRow)]
struct ChatRow {
    id: String,
    title: String,
    question: String,
    answer: String,
    pinned: bool,
    created_at: String,
    updated_at: String,
}

impl TryFrom<ChatRow> for ChatRecord {
    type Error = StorageError;

    fn try_from(row: ChatRow) -> Result<Self, Self::Error> {
        let created_at = parse_timestamp(&row.id, "created_at", &row.created_at)?;
        let updated_at = parse_timestamp(&row.id, "updated_at", &row.updated_at)?;

        Ok(Self {
            id: row.id,
            title: row.title,
            question: row.question,
            answer: row.answer,
            pinned: row.pinned,
            created_at,
            updated_at,
        })
    }
}

/// A timestamp that fails to parse marks a corrupt row; surfacing it
/// beats fabricating a value that could violate `updated_at >= created_at`.
fn parse_timestamp(
    id: &str,
    field: &str,
    raw: &str,
) -> StorageResult<chrono::DateTime<chrono::Utc>> {
    chrono::DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&chrono::Utc))
        .map_err(|e| StorageError::Corrupt {
            chat_id: id.to_string(),
            message: format!("invalid {} timestamp {:?}: {}", field, raw, e),
        })
}
