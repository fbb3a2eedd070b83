// Application state shared by every request handler
// Holds the AI gateway, the conversation store and the inbound rate limiter

use crate::api::rate_limit::RateLimiter;
use crate::config::Config;
use crate::gemini::{AiGateway, GeminiClient, ReplyCache, RetryPolicy};
use crate::store::ConversationStore;
use std::sync::Arc;

/// Main application state
///
/// Every dependency is created once at startup and injected into the router;
/// cloning the state only clones `Arc`s.
#[derive(Clone)]
pub struct AppState {
    /// Cached, retrying access to the AI provider
    pub gateway: Arc<AiGateway>,
    /// Conversation history
    pub store: Arc<ConversationStore>,
    /// Per-client-address request limiter
    pub rate_limiter: Arc<RateLimiter>,
}

impl AppState {
    /// Assemble state from already-built parts
    pub fn new(
        gateway: Arc<AiGateway>,
        store: Arc<ConversationStore>,
        rate_limiter: Arc<RateLimiter>,
    ) -> Self {
        Self {
            gateway,
            store,
            rate_limiter,
        }
    }

    /// Build every dependency described by `config`
    ///
    /// Connects to the database (creating it and applying migrations if
    /// needed) and prepares the Gemini client; no provider call is made.
    pub async fn from_config(config: &Config) -> anyhow::Result<Self> {
        let client = GeminiClient::new(&config.gemini)?;
        tracing::info!(model = %client.model(), "Gemini client ready");
        let gateway = AiGateway::new(
            Arc::new(client),
            ReplyCache::new(config.cache.ttl()),
            RetryPolicy::from_config(&config.gemini),
        );
        let store = ConversationStore::connect(&config.database.url).await?;
        let rate_limiter =
            RateLimiter::new(config.rate_limit.max_requests, config.rate_limit.window());

        Ok(Self::new(
            Arc::new(gateway),
            Arc::new(store),
            Arc::new(rate_limiter),
        ))
    }
}
