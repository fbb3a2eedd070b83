//! History API
//!
//! `GET /api/messages1`: stored conversations, newest first, paginated.

use crate::api::utils::{first_value, parse_positive_or, QueryPairs};
use crate::error::AppError;
use crate::state::AppState;
use crate::store::ConversationRecord;
use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};
use serde::Serialize;
use tracing::error;

/// Page returned when none is requested
pub const DEFAULT_PAGE: i64 = 1;
/// Page size used when none is requested
pub const DEFAULT_LIMIT: i64 = 10;

/// Raw pagination parameters
///
/// Kept as strings so that malformed values fall back to defaults instead of
/// rejecting the request. A repeated key uses its first value.
#[derive(Debug, Default)]
pub struct HistoryQuery {
    /// 1-based page number
    pub page: Option<String>,
    /// Records per page
    pub limit: Option<String>,
}

impl HistoryQuery {
    /// Pick the pagination parameters out of the raw query pairs
    pub fn from_pairs(pairs: &[(String, String)]) -> Self {
        Self {
            page: first_value(pairs, "page"),
            limit: first_value(pairs, "limit"),
        }
    }
}

/// One page of history
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryResponse {
    /// Always `true`
    pub success: bool,
    /// Number of stored records
    pub total_messages: i64,
    /// Page that was requested (after defaults and flooring)
    pub current_page: i64,
    /// `ceil(total_messages / limit)`
    pub total_pages: i64,
    /// Records on this page, newest first
    pub messages: Vec<ConversationRecord>,
}

/// Number of pages needed to show `total` records `limit` at a time
pub fn total_pages(total: i64, limit: i64) -> i64 {
    if total <= 0 {
        0
    } else {
        (total - 1) / limit + 1
    }
}

/// GET /api/messages1 - List stored conversations with pagination
///
/// A page past the end yields an empty `messages` array, not an error.
pub async fn list_messages(
    State(state): State<AppState>,
    query: Result<Query<QueryPairs>, QueryRejection>,
) -> Result<Json<HistoryResponse>, AppError> {
    let query = query
        .map(|Query(pairs)| HistoryQuery::from_pairs(&pairs))
        .unwrap_or_default();
    let page = parse_positive_or(query.page.as_deref(), DEFAULT_PAGE);
    let limit = parse_positive_or(query.limit.as_deref(), DEFAULT_LIMIT);

    let total_messages = state.store.count().await.map_err(|e| {
        error!(error = %e, "Failed to count messages");
        AppError::HistoryUnavailable(e)
    })?;
    let total_pages = total_pages(total_messages, limit);

    let messages = if page > total_pages {
        Vec::new()
    } else {
        let skip = (page - 1).saturating_mul(limit);
        state.store.list_page(skip, limit).await.map_err(|e| {
            error!(error = %e, "Failed to fetch messages");
            AppError::HistoryUnavailable(e)
        })?
    };

    Ok(Json(HistoryResponse {
        success: true,
        total_messages,
        current_page: page,
        total_pages,
        messages,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::test_support::create_test_state;
    use crate::gemini::gateway::tests::ScriptedGenerator;
    use std::sync::Arc;

    fn query(
        page: Option<&str>,
        limit: Option<&str>,
    ) -> Result<Query<QueryPairs>, QueryRejection> {
        let mut pairs = Vec::new();
        if let Some(page) = page {
            pairs.push(("page".to_string(), page.to_string()));
        }
        if let Some(limit) = limit {
            pairs.push(("limit".to_string(), limit.to_string()));
        }
        Ok(Query(pairs))
    }

    async fn seed(state: &AppState, count: usize) {
        for i in 0..count {
            let record = ConversationRecord {
                created_at: 1_000 + i as i64,
                ..ConversationRecord::new(
                    format!("message {}", i),
                    format!("reply {}", i),
                    format!("summary {}", i),
                    None,
                )
            };
            state.store.insert(&record).await.unwrap();
        }
    }

    #[test]
    fn test_total_pages() {
        assert_eq!(total_pages(0, 10), 0);
        assert_eq!(total_pages(1, 10), 1);
        assert_eq!(total_pages(10, 10), 1);
        assert_eq!(total_pages(11, 10), 2);
        assert_eq!(total_pages(7, 1), 7);
    }

    #[tokio::test]
    async fn test_empty_history() {
        let (state, _temp_dir) = create_test_state(Arc::new(ScriptedGenerator::echo())).await;
        let Json(response) = list_messages(State(state), query(None, None)).await.unwrap();

        assert!(response.success);
        assert_eq!(response.total_messages, 0);
        assert_eq!(response.current_page, 1);
        assert_eq!(response.total_pages, 0);
        assert!(response.messages.is_empty());
    }

    #[tokio::test]
    async fn test_defaults_and_ordering() {
        let (state, _temp_dir) = create_test_state(Arc::new(ScriptedGenerator::echo())).await;
        seed(&state, 12).await;

        let Json(response) = list_messages(State(state), query(None, None)).await.unwrap();
        assert_eq!(response.total_messages, 12);
        assert_eq!(response.total_pages, 2);
        assert_eq!(response.messages.len(), 10);
        assert_eq!(response.messages[0].user_message, "message 11");
        assert_eq!(response.messages[9].user_message, "message 2");
    }

    #[tokio::test]
    async fn test_pages_cover_history_exactly_once() {
        let (state, _temp_dir) = create_test_state(Arc::new(ScriptedGenerator::echo())).await;
        seed(&state, 7).await;

        let mut seen = Vec::new();
        for page in 1..=3 {
            let page = page.to_string();
            let Json(response) = list_messages(State(state.clone()), query(Some(&page), Some("3")))
                .await
                .unwrap();
            assert_eq!(response.total_pages, 3);
            seen.extend(response.messages.into_iter().map(|m| m.user_message));
        }

        let expected: Vec<String> = (0..7).rev().map(|i| format!("message {}", i)).collect();
        assert_eq!(seen, expected);
    }

    #[tokio::test]
    async fn test_page_past_end_is_empty_success() {
        let (state, _temp_dir) = create_test_state(Arc::new(ScriptedGenerator::echo())).await;
        seed(&state, 3).await;

        let Json(response) = list_messages(State(state), query(Some("5"), Some("2")))
            .await
            .unwrap();
        assert!(response.success);
        assert_eq!(response.total_messages, 3);
        assert_eq!(response.current_page, 5);
        assert_eq!(response.total_pages, 2);
        assert!(response.messages.is_empty());
    }

    #[tokio::test]
    async fn test_invalid_params_fall_back() {
        let (state, _temp_dir) = create_test_state(Arc::new(ScriptedGenerator::echo())).await;
        seed(&state, 3).await;

        let Json(response) = list_messages(State(state), query(Some("abc"), Some("-4")))
            .await
            .unwrap();
        assert_eq!(response.current_page, 1);
        assert_eq!(response.total_pages, 3);
        assert_eq!(response.messages.len(), 1);
    }

    #[tokio::test]
    async fn test_repeated_page_key_uses_first_value() {
        let (state, _temp_dir) = create_test_state(Arc::new(ScriptedGenerator::echo())).await;
        seed(&state, 5).await;

        let pairs = vec![
            ("page".to_string(), "2".to_string()),
            ("page".to_string(), "1".to_string()),
            ("limit".to_string(), "2".to_string()),
        ];
        let Json(response) = list_messages(State(state), Ok(Query(pairs))).await.unwrap();
        assert_eq!(response.current_page, 2);
        assert_eq!(response.messages[0].user_message, "message 2");
    }

    #[tokio::test]
    async fn test_store_failure() {
        let (state, _temp_dir) = create_test_state(Arc::new(ScriptedGenerator::echo())).await;
        state.store.close().await;

        let err = list_messages(State(state), query(None, None))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::HistoryUnavailable(_)));
        assert_eq!(err.to_string(), "Failed to fetch chat messages");
    }
}
