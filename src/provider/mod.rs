//! Model provider trait and implementations.

pub mod http;

#[cfg(feature = "google")]
pub mod google;

use async_trait::async_trait;

#[cfg(feature = "google")]
use crate::config::ParleyConfig;
use crate::error::Result;
#[cfg(feature = "google")]
use crate::error::ParleyError;
use crate::types::{message::AgentToolCall, FinishReason, GenerationSettings, ModelMessage, Usage};

/// A request sent to a model provider.
#[derive(Debug, Clone)]
pub struct ProviderRequest {
    pub messages: Vec<ModelMessage>,
    pub settings: GenerationSettings,
    pub tools: Option<Vec<ToolDefinition>>,
}

/// Tool definition sent to the provider API.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub parameters: serde_json::Value,
}

/// Response from a provider.
#[derive(Debug, Clone)]
pub struct ProviderResponse {
    pub text: String,
    pub usage: Usage,
    pub tool_calls: Vec<AgentToolCall>,
    pub finish_reason: Option<FinishReason>,
}

/// Core trait implemented by model providers.
#[async_trait]
pub trait ModelProvider: Send + Sync {
    /// Provider name (e.g., "google").
    fn provider_name(&self) -> &str;

    /// The model ID this provider instance serves.
    fn model_id(&self) -> &str;

    /// Generate a single (non-streaming) model turn.
    async fn generate_text(&self, request: &ProviderRequest) -> Result<ProviderResponse>;
}

/// Create the Gemini provider for `model`, using credentials from `config`.
#[cfg(feature = "google")]
pub fn create_google_provider(
    model: crate::models::GoogleModel,
    config: &ParleyConfig,
) -> Result<google::GoogleProvider> {
    let api_key = config
        .google_api_key
        .clone()
        .ok_or_else(|| ParleyError::Authentication("Missing GOOGLE_API_KEY".into()))?;
    let provider = google::GoogleProvider::new(model, api_key);
    Ok(match &config.google_base_url {
        Some(url) => provider.with_base_url(url.clone()),
        None => provider,
    })
}
