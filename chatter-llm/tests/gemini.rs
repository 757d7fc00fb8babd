mod common;

use chatter_llm::gemini::GeminiClient;
use chatter_llm::traits::LlmClient;
use chatter_llm::LlmError;
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const GENERATE_PATH: &str = "/models/gemini-1.5-flash:generateContent";

fn client(server: &MockServer) -> GeminiClient {
    common::init_test_tracing();
    GeminiClient::new(
        "test-key".into(),
        "gemini-1.5-flash".into(),
        Duration::from_secs(2),
        Duration::from_secs(5),
    )
    .unwrap()
    .with_base_url(server.uri())
}

#[tokio::test]
async fn generate_returns_candidate_text() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .and(query_param("key", "test-key"))
        .and(body_partial_json(json!({"contents": [{"parts": [{"text": "Summarize this"}]}]})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{
                "content": {"parts": [{"text": "- **Rust** "}, {"text": "is popular"}], "role": "model"},
                "finishReason": "STOP"
            }],
            "usageMetadata": {"promptTokenCount": 10, "candidatesTokenCount": 5, "totalTokenCount": 15}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let resp = client(&server)
        .generate("Summarize this", None, None, None)
        .await
        .unwrap();
    assert_eq!(resp.text, "- **Rust** is popular");
    assert_eq!(resp.tokens_used, Some(15));
    assert_eq!(resp.model.as_deref(), Some("gemini-1.5-flash"));
}

#[tokio::test]
async fn too_many_requests_is_rate_limit() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(429).set_body_json(json!({
            "error": {"code": 429, "status": "RESOURCE_EXHAUSTED", "message": "Quota exceeded"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let err = client(&server)
        .generate("x", None, None, None)
        .await
        .unwrap_err();
    assert!(err.is_rate_limit(), "got {err:?}");
}

#[tokio::test]
async fn safety_finish_reason_is_blocked() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{"finishReason": "SAFETY"}]
        })))
        .mount(&server)
        .await;

    let err = client(&server)
        .generate("x", None, None, None)
        .await
        .unwrap_err();
    assert!(matches!(err, LlmError::Blocked(_)), "got {err:?}");
}

#[tokio::test]
async fn no_candidates_is_empty() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"candidates": []})))
        .mount(&server)
        .await;

    let err = client(&server)
        .generate("x", None, None, None)
        .await
        .unwrap_err();
    assert_eq!(err, LlmError::Empty);
}

#[tokio::test]
async fn server_error_is_not_rate_limit() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "error": {"code": 500, "status": "INTERNAL", "message": "backend error"}
        })))
        .mount(&server)
        .await;

    match client(&server).generate("x", None, None, None).await {
        Err(LlmError::Api { status, message }) => {
            assert_eq!(status, 500);
            assert!(message.contains("backend error"));
        }
        other => panic!("unexpected {other:?}"),
    }
}
