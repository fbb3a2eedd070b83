//! Conversation data models
//!
//! Defines the persisted record of one user/bot exchange.

use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};
use sqlx::FromRow;

/// One persisted user/bot exchange
///
/// Records are immutable once inserted. `email_reply` is `None` unless the
/// caller asked for an email-style reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ConversationRecord {
    /// Opaque identifier (UUID v4)
    #[serde(rename = "_id")]
    pub id: String,
    /// Raw user input
    pub user_message: String,
    /// Generated reply
    pub bot_reply: String,
    /// Generated summary of the user input
    pub summary: String,
    /// Generated formal email, only in email mode
    pub email_reply: Option<String>,
    /// Creation time (Unix milliseconds), serialized as RFC 3339
    #[serde(serialize_with = "serialize_millis")]
    pub created_at: i64,
}

impl ConversationRecord {
    /// Create a new record stamped with the current time
    pub fn new(
        user_message: String,
        bot_reply: String,
        summary: String,
        email_reply: Option<String>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            user_message,
            bot_reply,
            summary,
            email_reply,
            created_at: Utc::now().timestamp_millis(),
        }
    }
}

fn serialize_millis<S: Serializer>(millis: &i64, serializer: S) -> Result<S::Ok, S::Error> {
    match DateTime::<Utc>::from_timestamp_millis(*millis) {
        Some(dt) => {
            serializer.serialize_str(&dt.to_rfc3339_opts(chrono::SecondsFormat::Millis, true))
        }
        None => serializer.serialize_none(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_record() {
        let record = ConversationRecord::new(
            "Plan my day".to_string(),
            "Sure".to_string(),
            "Wants a plan".to_string(),
            None,
        );
        assert!(!record.id.is_empty());
        assert!(record.email_reply.is_none());
        assert!(record.created_at > 0);
    }

    #[test]
    fn test_serialized_shape() {
        let record = ConversationRecord {
            id: "abc".to_string(),
            user_message: "Plan my day".to_string(),
            bot_reply: "Sure".to_string(),
            summary: "Wants a plan".to_string(),
            email_reply: None,
            created_at: 0,
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["_id"], "abc");
        assert_eq!(json["userMessage"], "Plan my day");
        assert_eq!(json["botReply"], "Sure");
        assert_eq!(json["summary"], "Wants a plan");
        assert!(json["emailReply"].is_null());
        assert_eq!(json["createdAt"], "1970-01-01T00:00:00.000Z");
    }
}
