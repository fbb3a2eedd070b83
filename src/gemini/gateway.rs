//! AI gateway
//!
//! Wraps a [`TextGenerator`] with the reply cache and the retry policy.
//! This is the only entry point the HTTP handlers use to reach the provider.

use crate::gemini::cache::ReplyCache;
use crate::gemini::error::ProviderError;
use crate::gemini::retry::RetryPolicy;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, warn};

/// Something that turns a prompt into generated text
///
/// Implemented by [`crate::gemini::GeminiClient`]; tests substitute an
/// in-process fake.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generate a reply for `prompt`
    async fn generate(&self, prompt: &str) -> Result<String, ProviderError>;
}

/// Cached, retrying access to the provider
pub struct AiGateway {
    generator: Arc<dyn TextGenerator>,
    cache: ReplyCache,
    retry: RetryPolicy,
}

impl AiGateway {
    /// Create a gateway over `generator`
    pub fn new(generator: Arc<dyn TextGenerator>, cache: ReplyCache, retry: RetryPolicy) -> Self {
        Self {
            generator,
            cache,
            retry,
        }
    }

    /// The reply cache (exposed for inspection)
    pub fn cache(&self) -> &ReplyCache {
        &self.cache
    }

    /// Get a reply for `prompt`
    ///
    /// Unless `skip_cache` is set, a cached reply is returned without calling
    /// the provider, and a fresh reply is cached for the default TTL.
    /// Transient failures are retried according to the retry policy.
    ///
    /// # Errors
    /// * `ProviderError` from the last attempt when every attempt failed
    pub async fn get_reply(&self, prompt: &str, skip_cache: bool) -> Result<String, ProviderError> {
        if !skip_cache {
            if let Some(reply) = self.cache.get(prompt).await {
                debug!(prompt_len = prompt.len(), "Returning cached response");
                return Ok(reply);
            }
        }

        let reply = self.generate_with_retry(prompt).await?;

        if !skip_cache {
            self.cache.insert(prompt, reply.clone()).await;
        }
        Ok(reply)
    }

    async fn generate_with_retry(&self, prompt: &str) -> Result<String, ProviderError> {
        let mut attempt = 0;
        loop {
            match self.generator.generate(prompt).await {
                Ok(reply) => return Ok(reply),
                Err(e) if e.is_transient() && attempt < self.retry.max_retries => {
                    let delay = self.retry.delay_for(attempt);
                    attempt += 1;
                    warn!(
                        attempt = attempt,
                        max_retries = self.retry.max_retries,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "Transient provider failure, retrying"
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }
}
