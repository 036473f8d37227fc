//! OpenAI-compatible backend against a mock HTTP server.

use std::sync::Arc;
use std::time::Duration;

use quire_inference::openai::{OpenAICompatBackend, OpenAICompatConfig};
use quire_inference::{AssistAction, AssistCoordinator, AssistRequest, Error, GenerationBackend};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn backend(server: &MockServer, api_key: Option<&str>) -> OpenAICompatBackend {
    OpenAICompatBackend::new(OpenAICompatConfig {
        base_url: server.uri(),
        api_key: api_key.map(str::to_string),
        model: "test-gen".to_string(),
        timeout_seconds: 5,
    })
    .expect("Failed to create backend")
}

fn chat_response(content: &str) -> serde_json::Value {
    json!({
        "id": "chatcmpl-123",
        "choices": [{
            "index": 0,
            "message": {"role": "assistant", "content": content},
            "finish_reason": "stop"
        }]
    })
}

#[tokio::test]
async fn test_generation_sends_bearer_and_messages() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("Authorization", "Bearer test-key"))
        .and(body_partial_json(json!({
            "model": "test-gen",
            "messages": [
                {"role": "system", "content": "Be brief."},
                {"role": "user", "content": "Hello"}
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(chat_response("Hi!")))
        .expect(1)
        .mount(&server)
        .await;

    let text = backend(&server, Some("test-key"))
        .generate_with_system("Be brief.", "Hello")
        .await
        .unwrap();
    assert_eq!(text, "Hi!");
}

#[tokio::test]
async fn test_error_status_maps_to_inference_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(429).set_body_json(json!({
            "error": {"code": 429, "message": "Quota exceeded", "status": "RESOURCE_EXHAUSTED"}
        })))
        .mount(&server)
        .await;

    let err = backend(&server, None).generate("Hello").await.unwrap_err();
    match err {
        Error::Inference(msg) => {
            assert!(msg.contains("429"));
            assert!(msg.contains("Quota exceeded"));
        }
        other => panic!("expected inference error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_unreadable_body_is_inference_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    assert!(matches!(
        backend(&server, None).generate("Hello").await,
        Err(Error::Inference(_))
    ));
}

#[tokio::test]
async fn test_assist_over_http_falls_back_on_server_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let assist = AssistCoordinator::new(Arc::new(backend(&server, None)), Duration::from_secs(5));
    let outcome = assist
        .run(&AssistRequest::new(AssistAction::FixGrammar, "teh draft"))
        .await
        .unwrap();
    assert!(outcome.fallback);
    assert_eq!(outcome.text, "teh draft");
    assert_eq!(outcome.model, "test-gen");
}

#[tokio::test]
async fn test_assist_over_http_strips_fence() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(chat_response("```\nThe fixed draft.\n```")),
        )
        .mount(&server)
        .await;

    let assist = AssistCoordinator::new(Arc::new(backend(&server, None)), Duration::from_secs(5));
    let outcome = assist
        .run(&AssistRequest::new(AssistAction::FixGrammar, "teh draft"))
        .await
        .unwrap();
    assert!(!outcome.fallback);
    assert_eq!(outcome.text, "The fixed draft.");
}
