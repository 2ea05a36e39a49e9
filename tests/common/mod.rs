//! Shared test helpers: a scripted provider and LangGraph SSE bodies.

#![allow(dead_code)]

use std::sync::Mutex;

use async_trait::async_trait;

use parley::error::{ParleyError, Result};
use parley::provider::{ModelProvider, ProviderRequest, ProviderResponse};
use parley::types::*;

/// A provider that replays queued responses and records every request.
pub struct MockProvider {
    model_id: String,
    responses: Mutex<Vec<ProviderResponse>>,
    requests: Mutex<Vec<ProviderRequest>>,
}

impl MockProvider {
    pub fn new(model_id: &str) -> Self {
        Self {
            model_id: model_id.to_string(),
            responses: Mutex::new(Vec::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Queue a plain text answer.
    pub fn queue_response(&self, text: &str) {
        self.responses.lock().unwrap().push(ProviderResponse {
            text: text.to_string(),
            usage: Usage {
                input_tokens: 10,
                output_tokens: 20,
                total_tokens: 30,
            },
            tool_calls: vec![],
            finish_reason: Some(FinishReason::Stop),
        });
    }

    /// Queue a single tool call.
    pub fn queue_tool_call(&self, id: &str, name: &str, args: serde_json::Value) {
        self.responses.lock().unwrap().push(ProviderResponse {
            text: String::new(),
            usage: Usage {
                input_tokens: 10,
                output_tokens: 5,
                total_tokens: 15,
            },
            tool_calls: vec![AgentToolCall {
                id: id.to_string(),
                name: name.to_string(),
                arguments: args,
            }],
            finish_reason: Some(FinishReason::ToolCalls),
        });
    }

    pub fn requests(&self) -> Vec<ProviderRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl ModelProvider for MockProvider {
    fn provider_name(&self) -> &str {
        "mock"
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }

    async fn generate_text(&self, request: &ProviderRequest) -> Result<ProviderResponse> {
        self.requests.lock().unwrap().push(request.clone());
        let mut responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            return Err(ParleyError::api(500, "No more mock responses"));
        }
        Ok(responses.remove(0))
    }
}

/// Render `(event, data)` pairs as an SSE body.
pub fn sse_body(events: &[(&str, serde_json::Value)]) -> String {
    events
        .iter()
        .map(|(event, data)| format!("event: {event}\ndata: {data}\n\n"))
        .collect()
}
