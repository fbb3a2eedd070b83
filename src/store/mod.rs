//! Conversation store module
//!
//! Persists conversation records in a SQLite database.

pub mod db;
pub mod error;
pub mod models;

pub use db::ConversationStore;
pub use error::StoreError;
pub use models::ConversationRecord;
