//! Chat API
//!
//! `POST /api/chat`: builds the reply, summary and (optionally) email prompts,
//! runs them through the AI gateway one after another, and persists the
//! exchange once every call has succeeded.

use crate::api::prompts;
use crate::api::utils::{first_value, validate_user_message, QueryPairs};
use crate::error::AppError;
use crate::state::AppState;
use crate::store::ConversationRecord;
use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

/// Request type that asks for an additional formal email reply
pub const EMAIL_TYPE: &str = "email";

/// Body of a chat request
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    /// Raw user input
    #[serde(default)]
    pub user_message: Option<String>,
    /// `"email"` to also generate a formal email reply
    #[serde(default, rename = "type")]
    pub request_type: Option<String>,
}

/// Query string of a chat request
#[derive(Debug, Default)]
pub struct ChatQuery {
    /// `"true"` bypasses the reply cache; a repeated key uses its first value
    pub nocache: Option<String>,
}

impl ChatQuery {
    /// Pick the chat parameters out of the raw query pairs
    pub fn from_pairs(pairs: &[(String, String)]) -> Self {
        Self {
            nocache: first_value(pairs, "nocache"),
        }
    }

    /// Whether the caller asked to bypass the cache
    pub fn skip_cache(&self) -> bool {
        self.nocache.as_deref() == Some("true")
    }
}

/// Successful chat response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatResponse {
    /// Always `true`
    pub success: bool,
    /// The user message, echoed back
    pub user_message: String,
    /// Generated reply
    pub bot_reply: String,
    /// Generated summary
    pub summary: String,
    /// Generated email, `null` unless requested
    pub email_reply: Option<String>,
}

/// POST /api/chat - Generate a reply and summary, then persist the exchange
///
/// Any provider failure aborts the request before anything is written.
pub async fn chat(
    State(state): State<AppState>,
    query: Result<Query<QueryPairs>, QueryRejection>,
    body: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ChatResponse>), AppError> {
    let query = query
        .map(|Query(pairs)| ChatQuery::from_pairs(&pairs))
        .unwrap_or_default();
    let Json(request) = body.map_err(|e| AppError::Validation(e.body_text()))?;
    let user_message = validate_user_message(request.user_message)?;
    let wants_email = request.request_type.as_deref() == Some(EMAIL_TYPE);
    let skip_cache = query.skip_cache();

    info!(
        message_len = user_message.len(),
        email = wants_email,
        skip_cache = skip_cache,
        "Chat request received"
    );

    let now = prompts::current_time();
    let gateway = &state.gateway;

    let bot_reply = gateway
        .get_reply(&prompts::reply_prompt(&user_message, &now), skip_cache)
        .await
        .inspect_err(|e| error!(error = %e, "Failed to generate reply"))?;

    let summary = gateway
        .get_reply(&prompts::summary_prompt(&user_message), skip_cache)
        .await
        .inspect_err(|e| error!(error = %e, "Failed to generate summary"))?;

    let email_reply = if wants_email {
        Some(
            gateway
                .get_reply(&prompts::email_prompt(&user_message, &now), skip_cache)
                .await
                .inspect_err(|e| error!(error = %e, "Failed to generate email reply"))?,
        )
    } else {
        None
    };

    let record = ConversationRecord::new(user_message, bot_reply, summary, email_reply);
    state
        .store
        .insert(&record)
        .await
        .inspect_err(|e| error!(error = %e, "Failed to save conversation"))?;

    info!(record_id = %record.id, "Conversation saved");

    Ok((
        StatusCode::CREATED,
        Json(ChatResponse {
            success: true,
            user_message: record.user_message,
            bot_reply: record.bot_reply,
            summary: record.summary,
            email_reply: record.email_reply,
        }),
    ))
}
