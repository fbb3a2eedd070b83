//! Store-specific error types

use thiserror::Error;

/// Errors that can occur while reading or writing conversation records
#[derive(Error, Debug)]
pub enum StoreError {
    /// The database could not be opened
    #[error("Database connection failed: {0}")]
    Connect(String),

    /// Applying the schema failed
    #[error("Migration failed: {0}")]
    Migration(String),

    /// A read or write failed
    #[error("{0}")]
    Query(String),
}
