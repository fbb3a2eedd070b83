//! Gemini API client
//!
//! Direct HTTP client for the Gemini `generateContent` endpoint.

use crate::config::GeminiConfig;
use crate::gemini::error::{ProviderError, UNKNOWN_ERROR};
use crate::gemini::gateway::TextGenerator;
use crate::gemini::types::{ErrorResponse, GenerateContentRequest, GenerateContentResponse};
use async_trait::async_trait;

/// HTTP client for a single Gemini model
pub struct GeminiClient {
    http: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiClient {
    /// Build a client from configuration
    ///
    /// The underlying `reqwest::Client` is shared across calls for
    /// connection pooling and carries the configured request timeout.
    pub fn new(config: &GeminiConfig) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()?;
        Ok(Self::with_http_client(
            http,
            &config.api_key,
            &config.model,
            &config.base_url,
        ))
    }

    /// Build a client around an existing `reqwest::Client`
    pub fn with_http_client(
        http: reqwest::Client,
        api_key: &str,
        model: &str,
        base_url: &str,
    ) -> Self {
        Self {
            http,
            api_key: api_key.to_string(),
            model: model.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Model this client talks to
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Send one prompt and return the generated text
    ///
    /// # Errors
    /// * `missing_api_key` if no key is configured (no request is made)
    /// * `transport_error` if the request could not be sent or read
    /// * the upstream status/type/message for non-success responses
    /// * `blocked_prompt` if the provider refused the prompt
    /// * `invalid_response` if the body has no usable text
    pub async fn generate_content(&self, prompt: &str) -> Result<String, ProviderError> {
        if self.api_key.is_empty() {
            return Err(ProviderError::missing_api_key());
        }

        let url = format!("{}/models/{}:generateContent", self.base_url, self.model);

        tracing::debug!(
            url = %url,
            model = %self.model,
            prompt_len = prompt.len(),
            "Calling Gemini API"
        );

        let response = self
            .http
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&GenerateContentRequest::from_prompt(prompt))
            .send()
            .await
            .map_err(|e| {
                ProviderError::transport(format!("Failed to send request to Gemini API: {}", e))
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            ProviderError::transport(format!("Failed to read Gemini API response: {}", e))
        })?;

        if !status.is_success() {
            let status_code = status.as_u16();
            tracing::error!(
                status_code = status_code,
                error_body = %body,
                "Gemini API returned error status"
            );
            return Err(upstream_error(status_code, &body));
        }

        let parsed: GenerateContentResponse = serde_json::from_str(&body).map_err(|e| {
            ProviderError::invalid_response(format!(
                "Failed to parse JSON response from Gemini API: {}",
                e
            ))
        })?;

        if let Some(reason) = parsed
            .prompt_feedback
            .as_ref()
            .and_then(|feedback| feedback.block_reason.as_deref())
        {
            return Err(ProviderError::blocked(reason));
        }

        let candidate = parsed.candidates.first().ok_or_else(|| {
            ProviderError::invalid_response("Gemini API response contains no candidates")
        })?;

        let text: String = candidate
            .content
            .iter()
            .flat_map(|content| content.parts.iter())
            .map(|part| part.text.as_str())
            .collect();

        if text.trim().is_empty() {
            let reason = candidate.finish_reason.as_deref().unwrap_or("none");
            return Err(ProviderError::invalid_response(format!(
                "Gemini API response text is empty (finish reason: {})",
                reason
            )));
        }

        tracing::debug!(
            response_len = text.len(),
            "Successfully received response from Gemini API"
        );

        Ok(text)
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String, ProviderError> {
        self.generate_content(prompt).await
    }
}

/// Map a non-success response to a `ProviderError`, preferring the
/// structured Gemini error body when there is one
fn upstream_error(status: u16, body: &str) -> ProviderError {
    match serde_json::from_str::<ErrorResponse>(body) {
        Ok(parsed) => ProviderError::upstream(
            status,
            parsed
                .error
                .status
                .unwrap_or_else(|| UNKNOWN_ERROR.to_string()),
            parsed
                .error
                .message
                .unwrap_or_else(|| "Unknown error occurred".to_string()),
        ),
        Err(_) if !body.trim().is_empty() => {
            ProviderError::upstream(status, UNKNOWN_ERROR, body.trim())
        }
        Err(_) => ProviderError::upstream(status, UNKNOWN_ERROR, "Unknown error occurred"),
    }
}
