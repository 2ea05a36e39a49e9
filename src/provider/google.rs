//! Google Gemini API provider.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Map, Value};
use tracing::debug;

use crate::error::{ParleyError, Result};
use crate::models::GoogleModel;
use crate::types::*;

use super::http::{error_from_response, shared_client};
use super::{ModelProvider, ProviderRequest, ProviderResponse};

const BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

pub struct GoogleProvider {
    model: GoogleModel,
    api_key: String,
    base_url: String,
}

impl GoogleProvider {
    pub fn new(model: GoogleModel, api_key: String) -> Self {
        Self {
            model,
            api_key,
            base_url: BASE_URL.to_string(),
        }
    }

    /// Point the provider at a different endpoint (proxies, tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub(crate) fn build_request_body(&self, request: &ProviderRequest) -> Value {
        let mut system_parts = Vec::new();
        let mut contents = Vec::new();

        for msg in &request.messages {
            match msg.role {
                Role::System => {
                    system_parts.push(json!({"text": msg.text()}));
                }
                Role::User => {
                    contents.push(json!({
                        "role": "user",
                        "parts": build_gemini_parts(&msg.content),
                    }));
                }
                Role::Assistant => {
                    contents.push(json!({
                        "role": "model",
                        "parts": build_gemini_parts(&msg.content),
                    }));
                }
                Role::Tool => {
                    let parts: Vec<Value> = msg
                        .content
                        .iter()
                        .filter_map(|part| match part {
                            ContentPart::ToolResult(tr) => Some(json!({
                                "functionResponse": {
                                    "name": tr.tool_name,
                                    "response": function_response_body(&tr.result),
                                }
                            })),
                            _ => None,
                        })
                        .collect();
                    if !parts.is_empty() {
                        contents.push(json!({"role": "user", "parts": parts}));
                    }
                }
            }
        }

        let mut body = Map::new();
        body.insert("contents".into(), Value::Array(contents));

        if !system_parts.is_empty() {
            body.insert("systemInstruction".into(), json!({"parts": system_parts}));
        }

        let mut gen_config = Map::new();
        if let Some(max) = request.settings.max_tokens {
            gen_config.insert("maxOutputTokens".into(), max.into());
        }
        if let Some(temp) = request.settings.temperature {
            gen_config.insert("temperature".into(), temp.into());
        }
        if let Some(top_p) = request.settings.top_p {
            gen_config.insert("topP".into(), top_p.into());
        }
        if let Some(top_k) = request.settings.top_k {
            gen_config.insert("topK".into(), top_k.into());
        }
        if let Some(ref stops) = request.settings.stop_sequences {
            gen_config.insert("stopSequences".into(), json!(stops));
        }
        if !gen_config.is_empty() {
            body.insert("generationConfig".into(), Value::Object(gen_config));
        }

        if let Some(ref tools) = request.tools {
            if !tools.is_empty() {
                let fn_decls: Vec<Value> = tools
                    .iter()
                    .map(|t| {
                        json!({
                            "name": t.name,
                            "description": t.description,
                            "parameters": t.parameters,
                        })
                    })
                    .collect();
                body.insert("tools".into(), json!([{"functionDeclarations": fn_decls}]));
            }
        }

        Value::Object(body)
    }
}

#[async_trait]
impl ModelProvider for GoogleProvider {
    fn provider_name(&self) -> &str {
        "google"
    }

    fn model_id(&self) -> &str {
        self.model.as_str()
    }

    async fn generate_text(&self, request: &ProviderRequest) -> Result<ProviderResponse> {
        let body = self.build_request_body(request);
        let url = format!(
            "{}/models/{}:generateContent",
            self.base_url,
            self.model.as_str()
        );

        debug!(model = self.model.as_str(), "Google generate_text");

        let resp = shared_client()
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(error_from_response(resp).await);
        }

        let data: GeminiResponse = resp.json().await?;

        let candidate = data
            .candidates
            .into_iter()
            .next()
            .ok_or_else(|| ParleyError::api(200, "No candidates in Gemini response"))?;

        let mut text = String::new();
        let mut tool_calls = Vec::new();

        for part in candidate.content.map(|c| c.parts).unwrap_or_default() {
            if let Some(t) = part.text {
                text.push_str(&t);
            }
            if let Some(fc) = part.function_call {
                tool_calls.push(AgentToolCall {
                    id: uuid::Uuid::new_v4().to_string(),
                    name: fc.name,
                    arguments: fc.args.unwrap_or_else(|| Value::Object(Map::new())),
                });
            }
        }

        let finish_reason = if !tool_calls.is_empty() {
            Some(FinishReason::ToolCalls)
        } else {
            match candidate.finish_reason.as_deref() {
                Some("STOP") => Some(FinishReason::Stop),
                Some("MAX_TOKENS") => Some(FinishReason::Length),
                Some("SAFETY") | Some("RECITATION") | Some("PROHIBITED_CONTENT") => {
                    Some(FinishReason::ContentFilter)
                }
                Some(_) => Some(FinishReason::Error),
                None => None,
            }
        };

        let usage = data
            .usage_metadata
            .map(|u| Usage {
                input_tokens: u.prompt_token_count,
                output_tokens: u.candidates_token_count,
                total_tokens: u.total_token_count,
            })
            .unwrap_or_default();

        Ok(ProviderResponse {
            text,
            usage,
            tool_calls,
            finish_reason,
        })
    }
}

fn build_gemini_parts(content: &[ContentPart]) -> Vec<Value> {
    content
        .iter()
        .filter_map(|part| match part {
            ContentPart::Text { text } if !text.is_empty() => Some(json!({"text": text})),
            ContentPart::Image(img) => Some(json!({
                "inlineData": {
                    "mimeType": img.mime_type,
                    "data": img.data,
                }
            })),
            ContentPart::ToolCall(tc) => Some(json!({
                "functionCall": {
                    "name": tc.name,
                    "args": tc.arguments,
                }
            })),
            _ => None,
        })
        .collect()
}

/// Gemini requires `functionResponse.response` to be an object.
fn function_response_body(result: &Value) -> Value {
    match result {
        Value::Object(_) => result.clone(),
        other => json!({"result": other}),
    }
}

// Internal Gemini response types

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
    usage_metadata: Option<GeminiUsage>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiCandidate {
    content: Option<GeminiContent>,
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct GeminiContent {
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiPart {
    text: Option<String>,
    function_call: Option<GeminiFunctionCall>,
}

#[derive(Deserialize)]
struct GeminiFunctionCall {
    name: String,
    args: Option<Value>,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
struct GeminiUsage {
    prompt_token_count: u32,
    candidates_token_count: u32,
    total_token_count: u32,
}
