//! Integration tests for the AI gateway over the real HTTP client
//!
//! A mockito server stands in for the Gemini API.

use gemini_chat_backend::config::GeminiConfig;
use gemini_chat_backend::gemini::{AiGateway, GeminiClient, ReplyCache, RetryPolicy};
use mockito::{Matcher, Server};
use serial_test::serial;
use std::sync::Arc;
use std::time::Duration;

const MODEL_PATH: &str = "/models/gemini-1.5-flash:generateContent";

const OK_BODY: &str = r#"{
    "candidates": [{
        "content": {"parts": [{"text": "Here is your plan."}], "role": "model"},
        "finishReason": "STOP"
    }]
}"#;

fn gateway_for(base_url: &str, retry: RetryPolicy) -> AiGateway {
    let config = GeminiConfig {
        api_key: "test-key".to_string(),
        model: "gemini-1.5-flash".to_string(),
        base_url: base_url.to_string(),
        timeout_secs: 5,
        max_retries: retry.max_retries,
        retry_delay_ms: 1,
    };
    let client = GeminiClient::new(&config).expect("Failed to build client");
    AiGateway::new(
        Arc::new(client),
        ReplyCache::new(Duration::from_secs(3600)),
        retry,
    )
}

#[tokio::test]
#[serial]
async fn test_cached_prompt_hits_provider_once() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", MODEL_PATH)
        .match_query(Matcher::UrlEncoded("key".into(), "test-key".into()))
        .with_status(200)
        .with_body(OK_BODY)
        .expect(1)
        .create_async()
        .await;

    let gateway = gateway_for(&server.url(), RetryPolicy::none());
    let first = gateway.get_reply("Plan my day", false).await.unwrap();
    let second = gateway.get_reply("Plan my day", false).await.unwrap();

    mock.assert_async().await;
    assert_eq!(first, "Here is your plan.");
    assert_eq!(second, first);
}

#[tokio::test]
#[serial]
async fn test_skip_cache_hits_provider_every_time() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", MODEL_PATH)
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(OK_BODY)
        .expect(3)
        .create_async()
        .await;

    let gateway = gateway_for(&server.url(), RetryPolicy::none());
    gateway.get_reply("Plan my day", false).await.unwrap();
    gateway.get_reply("Plan my day", true).await.unwrap();
    gateway.get_reply("Plan my day", true).await.unwrap();

    mock.assert_async().await;
}

#[tokio::test]
#[serial]
async fn test_server_errors_are_retried_then_reported() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", MODEL_PATH)
        .match_query(Matcher::Any)
        .with_status(503)
        .with_body(r#"{"error": {"code": 503, "message": "The model is overloaded.", "status": "UNAVAILABLE"}}"#)
        .expect(3)
        .create_async()
        .await;

    let gateway = gateway_for(
        &server.url(),
        RetryPolicy::new(2, Duration::from_millis(1)),
    );
    let err = gateway.get_reply("Plan my day", false).await.unwrap_err();

    mock.assert_async().await;
    assert_eq!(err.status, 503);
    assert_eq!(err.to_string(), "UNAVAILABLE: The model is overloaded.");
    assert!(gateway.cache().is_empty().await);
}

#[tokio::test]
#[serial]
async fn test_client_errors_are_not_retried() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", MODEL_PATH)
        .match_query(Matcher::Any)
        .with_status(400)
        .with_body(r#"{"error": {"code": 400, "message": "API key not valid.", "status": "INVALID_ARGUMENT"}}"#)
        .expect(1)
        .create_async()
        .await;

    let gateway = gateway_for(
        &server.url(),
        RetryPolicy::new(5, Duration::from_millis(1)),
    );
    let err = gateway.get_reply("Plan my day", false).await.unwrap_err();

    mock.assert_async().await;
    assert_eq!(err.status, 400);
    assert_eq!(err.error_type, "INVALID_ARGUMENT");
}
