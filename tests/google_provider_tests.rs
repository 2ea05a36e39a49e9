//! Gemini provider tests against a mocked generateContent endpoint.

#![cfg(feature = "google")]

use parley::error::ParleyError;
use parley::models::GoogleModel;
use parley::provider::google::GoogleProvider;
use parley::provider::{ModelProvider, ProviderRequest, ToolDefinition};
use parley::types::*;
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const GENERATE_PATH: &str = "/models/gemini-2.0-flash:generateContent";

fn provider(server: &MockServer) -> GoogleProvider {
    GoogleProvider::new(GoogleModel::Gemini20Flash, "test-key".into()).with_base_url(server.uri())
}

fn request(messages: Vec<ModelMessage>) -> ProviderRequest {
    ProviderRequest {
        messages,
        settings: GenerationSettings::default(),
        tools: None,
    }
}

#[tokio::test]
async fn text_response_is_parsed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .and(header("x-goog-api-key", "test-key"))
        .and(body_partial_json(json!({
            "systemInstruction": {"parts": [{"text": "Be brief."}]},
            "contents": [{"role": "user", "parts": [{"text": "hi"}]}]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{
                "content": {"role": "model", "parts": [{"text": "Hello"}, {"text": " there"}]},
                "finishReason": "STOP"
            }],
            "usageMetadata": {"promptTokenCount": 4, "candidatesTokenCount": 2, "totalTokenCount": 6}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let response = provider(&server)
        .generate_text(&request(vec![
            ModelMessage::system("Be brief."),
            ModelMessage::user("hi"),
        ]))
        .await
        .unwrap();

    assert_eq!(response.text, "Hello there");
    assert_eq!(response.finish_reason, Some(FinishReason::Stop));
    assert_eq!(
        response.usage,
        Usage {
            input_tokens: 4,
            output_tokens: 2,
            total_tokens: 6
        }
    );
    assert!(response.tool_calls.is_empty());
}

#[tokio::test]
async fn function_call_becomes_tool_call() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .and(body_partial_json(json!({
            "tools": [{"functionDeclarations": [{"name": "current_datetime"}]}]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{
                "content": {"role": "model", "parts": [{
                    "functionCall": {"name": "current_datetime", "args": {"utc_offset_hours": -3}}
                }]},
                "finishReason": "STOP"
            }]
        })))
        .mount(&server)
        .await;

    let mut req = request(vec![ModelMessage::user("what time is it in Recife?")]);
    req.tools = Some(vec![ToolDefinition {
        name: "current_datetime".into(),
        description: "Current date and time".into(),
        parameters: json!({"type": "object", "properties": {"utc_offset_hours": {"type": "number"}}}),
    }]);

    let response = provider(&server).generate_text(&req).await.unwrap();
    assert_eq!(response.finish_reason, Some(FinishReason::ToolCalls));
    assert_eq!(response.tool_calls.len(), 1);
    assert_eq!(response.tool_calls[0].name, "current_datetime");
    assert_eq!(response.tool_calls[0].arguments, json!({"utc_offset_hours": -3}));
    assert!(!response.tool_calls[0].id.is_empty());
}

#[tokio::test]
async fn empty_candidates_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"candidates": []})))
        .mount(&server)
        .await;

    let err = provider(&server)
        .generate_text(&request(vec![ModelMessage::user("hi")]))
        .await
        .unwrap_err();
    assert!(matches!(err, ParleyError::Api { .. }), "{err:?}");
}

#[tokio::test]
async fn auth_failure_is_mapped() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(403).set_body_string("API key not valid"))
        .mount(&server)
        .await;

    let err = provider(&server)
        .generate_text(&request(vec![ModelMessage::user("hi")]))
        .await
        .unwrap_err();
    assert!(matches!(err, ParleyError::Authentication(_)));
    assert!(!err.is_retryable());
}

#[tokio::test]
async fn rate_limit_is_retryable() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(429).set_body_string("{}"))
        .mount(&server)
        .await;

    let err = provider(&server)
        .generate_text(&request(vec![ModelMessage::user("hi")]))
        .await
        .unwrap_err();
    assert!(err.is_retryable());
}
