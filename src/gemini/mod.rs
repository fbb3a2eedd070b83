//! Gemini gateway module
//!
//! HTTP client for the Gemini API, plus the reply cache and retry policy that
//! the gateway layers on top of it.

pub mod cache;
pub mod client;
pub mod error;
pub mod gateway;
pub mod retry;
pub mod types;

pub use cache::ReplyCache;
pub use client::GeminiClient;
pub use error::ProviderError;
pub use gateway::{AiGateway, TextGenerator};
pub use retry::RetryPolicy;
