//! Error types and error handling for the application
//!
//! This module defines the endpoint-boundary error type. All errors implement
//! `IntoResponse` and render the same JSON envelope:
//! `{"success": false, "error": "<message>"}`.

use crate::gemini::ProviderError;
use crate::store::StoreError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Message returned to clients that exceed the rate limit
pub const RATE_LIMIT_MESSAGE: &str = "Too many requests from this IP, please try again later.";

/// Application-level error types
#[derive(Error, Debug)]
pub enum AppError {
    /// The AI provider failed
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// Persisting a record failed
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Reading conversation history failed
    #[error("Failed to fetch chat messages")]
    HistoryUnavailable(#[source] StoreError),

    /// The request body was missing or invalid
    #[error("{0}")]
    Validation(String),

    /// The client exceeded the inbound rate limit
    #[error("{}", RATE_LIMIT_MESSAGE)]
    RateLimited,

    /// No route matched the request
    #[error("Route not found")]
    RouteNotFound,
}

impl AppError {
    /// HTTP status for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            AppError::RouteNotFound => StatusCode::NOT_FOUND,
            AppError::Provider(_) | AppError::Store(_) | AppError::HistoryUnavailable(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let body = match &self {
            AppError::HistoryUnavailable(source) => json!({
                "success": false,
                "error": self.to_string(),
                "details": source.to_string(),
            }),
            _ => json!({
                "success": false,
                "error": self.to_string(),
            }),
        };

        (status, Json(body)).into_response()
    }
}
