//! Application configuration
//!
//! Centralized configuration management with environment variable support
//! and sensible defaults. Loaded once at startup; there is no hot-reload.

use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Default Gemini API base URL
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Default Gemini model
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash";

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Server configuration
    pub server: ServerConfig,
    /// Gemini provider configuration
    pub gemini: GeminiConfig,
    /// Database configuration
    pub database: DatabaseConfig,
    /// Reply cache configuration
    pub cache: CacheConfig,
    /// Inbound rate limiting configuration
    pub rate_limit: RateLimitConfig,
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Port to bind the server to
    pub port: u16,
    /// Host address to bind to
    pub host: String,
}

/// Gemini provider configuration
#[derive(Clone)]
pub struct GeminiConfig {
    /// API key (may be empty; calls then fail with `missing_api_key`)
    pub api_key: String,
    /// Model name
    pub model: String,
    /// API base URL
    pub base_url: String,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
    /// How many times a transient failure is retried
    pub max_retries: u32,
    /// Base backoff delay in milliseconds
    pub retry_delay_ms: u64,
}

// Hand-written so the API key never reaches the logs.
impl std::fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key_set", &!self.api_key.is_empty())
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .field("max_retries", &self.max_retries)
            .field("retry_delay_ms", &self.retry_delay_ms)
            .finish()
    }
}

/// Database configuration
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// SQLite connection URL or file path
    pub url: String,
}

/// Reply cache configuration
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Time-to-live for cached replies, in seconds
    pub ttl_secs: u64,
}

/// Inbound rate limiting configuration
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    /// Requests allowed per client address within one window
    pub max_requests: usize,
    /// Window length in seconds
    pub window_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                port: 5000,
                host: "0.0.0.0".to_string(),
            },
            gemini: GeminiConfig {
                api_key: String::new(),
                model: DEFAULT_GEMINI_MODEL.to_string(),
                base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
                timeout_secs: 30,
                max_retries: 3,
                retry_delay_ms: 1000,
            },
            database: DatabaseConfig {
                url: default_database_path(),
            },
            cache: CacheConfig { ttl_secs: 3600 },
            rate_limit: RateLimitConfig {
                max_requests: 100,
                window_secs: 15 * 60,
            },
        }
    }
}

impl Config {
    /// Load configuration from environment variables with defaults
    ///
    /// A `.env` file in the working directory is read first if present.
    /// Values that fail to parse fall back to their defaults.
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();
        let defaults = Self::default();

        Self {
            server: ServerConfig {
                port: parse_env("PORT", defaults.server.port),
                host: env::var("HOST").unwrap_or(defaults.server.host),
            },
            gemini: GeminiConfig {
                api_key: env::var("GEMINI_API_KEY").unwrap_or_default(),
                model: env::var("GEMINI_MODEL").unwrap_or(defaults.gemini.model),
                base_url: env::var("GEMINI_API_BASE_URL").unwrap_or(defaults.gemini.base_url),
                timeout_secs: parse_env("GEMINI_TIMEOUT_SECS", defaults.gemini.timeout_secs),
                max_retries: parse_env("GEMINI_MAX_RETRIES", defaults.gemini.max_retries),
                retry_delay_ms: parse_env("GEMINI_RETRY_DELAY_MS", defaults.gemini.retry_delay_ms),
            },
            database: DatabaseConfig {
                url: env::var("DATABASE_URL").unwrap_or(defaults.database.url),
            },
            cache: CacheConfig {
                ttl_secs: parse_env("CACHE_TTL_SECS", defaults.cache.ttl_secs),
            },
            rate_limit: RateLimitConfig {
                max_requests: parse_env(
                    "RATE_LIMIT_MAX_REQUESTS",
                    defaults.rate_limit.max_requests,
                ),
                window_secs: parse_env("RATE_LIMIT_WINDOW_SECS", defaults.rate_limit.window_secs),
            },
        }
    }

    /// Get the server address as a string
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

impl GeminiConfig {
    /// Request timeout as a `Duration`
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl CacheConfig {
    /// Cache TTL as a `Duration`
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
}

impl RateLimitConfig {
    /// Window length as a `Duration`
    pub fn window(&self) -> Duration {
        Duration::from_secs(self.window_secs)
    }
}

fn parse_env<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

/// `DATA_DIR/chat.db`, with `DATA_DIR` defaulting to `~/.gemini-chat`
fn default_database_path() -> String {
    let data_dir = env::var("DATA_DIR").unwrap_or_else(|_| {
        if let Some(home) = env::var_os("HOME") {
            format!("{}/.gemini-chat", home.to_string_lossy())
        } else {
            ".gemini-chat".to_string()
        }
    });
    format!("{}/chat.db", data_dir)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.gemini.model, "gemini-1.5-flash");
        assert_eq!(config.cache.ttl(), Duration::from_secs(3600));
        assert_eq!(config.rate_limit.max_requests, 100);
        assert_eq!(config.rate_limit.window(), Duration::from_secs(900));
        assert!(config.database.url.ends_with("chat.db"));
    }

    #[test]
    fn test_server_addr() {
        let mut config = Config::default();
        config.server.host = "127.0.0.1".to_string();
        config.server.port = 8081;
        assert_eq!(config.server_addr(), "127.0.0.1:8081");
    }

    #[test]
    fn test_debug_hides_api_key() {
        let mut config = Config::default();
        config.gemini.api_key = "super-secret-key".to_string();
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("super-secret-key"));
        assert!(rendered.contains("api_key_set: true"));
    }

    #[test]
    fn test_parse_env_falls_back_on_garbage() {
        std::env::set_var("GEMINI_CHAT_TEST_PARSE_ENV", "not-a-number");
        assert_eq!(parse_env("GEMINI_CHAT_TEST_PARSE_ENV", 42u64), 42);
        std::env::set_var("GEMINI_CHAT_TEST_PARSE_ENV", " 7 ");
        assert_eq!(parse_env("GEMINI_CHAT_TEST_PARSE_ENV", 42u64), 7);
        std::env::remove_var("GEMINI_CHAT_TEST_PARSE_ENV");
        assert_eq!(parse_env("GEMINI_CHAT_TEST_PARSE_ENV", 42u64), 42);
    }
}
