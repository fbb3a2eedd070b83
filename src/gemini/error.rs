//! Provider error type
//!
//! Failures from the generative-text provider, carrying the upstream status,
//! an error type string and a human-readable message.

use thiserror::Error;

/// Provider error type for a request that never reached the provider
pub const TRANSPORT_ERROR: &str = "transport_error";
/// Provider error type for a body that could not be interpreted
pub const INVALID_RESPONSE: &str = "invalid_response";
/// Provider error type for a missing API key
pub const MISSING_API_KEY: &str = "missing_api_key";
/// Provider error type for a prompt rejected by safety filters
pub const BLOCKED_PROMPT: &str = "blocked_prompt";
/// Provider error type used when the upstream body carries none
pub const UNKNOWN_ERROR: &str = "unknown_error";

/// Errors raised by a call to the generative-text provider
///
/// Displays as `"<type>: <message>"`, which is also what the chat endpoint
/// returns to the client.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{error_type}: {message}")]
pub struct ProviderError {
    /// HTTP status reported (or implied) by the provider
    pub status: u16,
    /// Machine-readable error type
    pub error_type: String,
    /// Human-readable message
    pub message: String,
    transient: bool,
}

impl ProviderError {
    /// Error returned by the provider with a non-success HTTP status
    ///
    /// 429 and 5xx responses are treated as transient.
    pub fn upstream(
        status: u16,
        error_type: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            status,
            error_type: error_type.into(),
            message: message.into(),
            transient: status == 429 || status >= 500,
        }
    }

    /// The request could not be sent or the response could not be read
    pub fn transport(message: impl Into<String>) -> Self {
        Self {
            status: 502,
            error_type: TRANSPORT_ERROR.to_string(),
            message: message.into(),
            transient: true,
        }
    }

    /// The provider answered, but without usable text
    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self {
            status: 502,
            error_type: INVALID_RESPONSE.to_string(),
            message: message.into(),
            transient: false,
        }
    }

    /// No API key configured
    pub fn missing_api_key() -> Self {
        Self {
            status: 401,
            error_type: MISSING_API_KEY.to_string(),
            message: "API key is empty".to_string(),
            transient: false,
        }
    }

    /// The provider refused the prompt
    pub fn blocked(reason: impl Into<String>) -> Self {
        Self {
            status: 400,
            error_type: BLOCKED_PROMPT.to_string(),
            message: format!("prompt was blocked: {}", reason.into()),
            transient: false,
        }
    }

    /// Whether retrying the same request may succeed
    pub fn is_transient(&self) -> bool {
        self.transient
    }
}
