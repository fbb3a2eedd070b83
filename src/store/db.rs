//! Conversation database operations
//!
//! Append-only SQLite table of conversation records: insert, count and a
//! reverse-chronological paginated scan. There is no update or delete path.

use crate::store::error::StoreError;
use crate::store::models::ConversationRecord;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, info};

const MIGRATION_SQL: &str = include_str!("../../migrations/001_create_messages.sql");

/// Database connection pool for conversation records
pub struct ConversationStore {
    pool: SqlitePool,
}

impl ConversationStore {
    /// Open (creating if needed) the database and apply migrations
    ///
    /// # Arguments
    /// * `db_url` - `sqlite:` URL or plain path to the database file
    pub async fn connect(db_url: &str) -> Result<Self, StoreError> {
        let connection_string = if db_url.starts_with("sqlite:") {
            db_url.to_string()
        } else {
            format!("sqlite:{}", db_url)
        };

        if let Some(parent) = file_parent(&connection_string) {
            std::fs::create_dir_all(parent).map_err(|e| {
                StoreError::Connect(format!("Failed to create db directory: {}", e))
            })?;
        }

        let options = SqliteConnectOptions::from_str(&connection_string)
            .map_err(|e| StoreError::Connect(format!("Invalid database path: {}", e)))?
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .map_err(|e| StoreError::Connect(format!("Failed to connect to database: {}", e)))?;

        info!("Connected to SQLite database at: {}", db_url);

        let store = Self { pool };
        store.run_migrations().await?;
        Ok(store)
    }

    /// Apply the embedded schema, one statement at a time
    async fn run_migrations(&self) -> Result<(), StoreError> {
        for statement in split_statements(MIGRATION_SQL) {
            sqlx::query(&statement)
                .execute(&self.pool)
                .await
                .map_err(|e| {
                    StoreError::Migration(format!(
                        "{} - Statement: {}",
                        e,
                        statement.chars().take(100).collect::<String>()
                    ))
                })?;
        }

        debug!("Database migrations completed");
        Ok(())
    }

    /// Persist a new record
    pub async fn insert(&self, record: &ConversationRecord) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO messages (id, user_message, bot_reply, summary, email_reply, created_at) VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(&record.id)
        .bind(&record.user_message)
        .bind(&record.bot_reply)
        .bind(&record.summary)
        .bind(&record.email_reply)
        .bind(record.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::Query(format!("Failed to save message: {}", e)))?;

        debug!("Saved conversation record: {}", record.id);
        Ok(())
    }

    /// Total number of records
    pub async fn count(&self) -> Result<i64, StoreError> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM messages")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| StoreError::Query(format!("Failed to count messages: {}", e)))
    }

    /// Records newest first, skipping `skip` and returning at most `limit`
    ///
    /// Ties on `created_at` are broken by insertion order so that pages never
    /// overlap or skip records.
    pub async fn list_page(
        &self,
        skip: i64,
        limit: i64,
    ) -> Result<Vec<ConversationRecord>, StoreError> {
        sqlx::query_as::<_, ConversationRecord>(
            "SELECT id, user_message, bot_reply, summary, email_reply, created_at FROM messages ORDER BY created_at DESC, rowid DESC LIMIT ? OFFSET ?",
        )
        .bind(limit)
        .bind(skip)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StoreError::Query(format!("Failed to fetch messages: {}", e)))
    }

    /// Close every pooled connection; later queries fail with `StoreError`
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

/// Parent directory of a file-backed SQLite URL, if it has one
fn file_parent(connection_string: &str) -> Option<&Path> {
    let path = connection_string
        .trim_start_matches("sqlite:")
        .trim_start_matches("//");
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() || path.starts_with(":memory:") {
        return None;
    }
    Path::new(path)
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
}

/// Strip `--` comments and split a SQL script into statements
fn split_statements(sql: &str) -> Vec<String> {
    let mut cleaned = String::new();
    for line in sql.lines() {
        let code = match line.find("--") {
            Some(pos) => &line[..pos],
            None => line,
        };
        let code = code.trim();
        if !code.is_empty() {
            cleaned.push_str(code);
            cleaned.push(' ');
        }
    }

    cleaned
        .split(';')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
