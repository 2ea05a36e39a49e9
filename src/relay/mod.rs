//! Message relay: forwards a chat message to the hosted agent and returns its reply.

pub mod extract;

pub use extract::extract_reply;

use futures::StreamExt;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, error, info};
use uuid::Uuid;

use crate::config::ParleyConfig;
use crate::error::Result;
use crate::langgraph::{
    IfNotExists, LangGraphClient, MultitaskStrategy, RunStreamRequest, StreamMode, StreamPart,
};

/// An image attached to an inbound message, in OpenAI `image_url` form.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ImageInput {
    pub image_url: ImageUrl,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ImageUrl {
    /// `https://` or `data:` URL.
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl ImageInput {
    pub fn from_url(url: impl Into<String>) -> Self {
        Self {
            image_url: ImageUrl {
                url: url.into(),
                detail: None,
            },
        }
    }
}

/// Deterministic thread id for an external conversation id (UUIDv5, DNS namespace).
pub fn thread_id_for(id: &str) -> Uuid {
    Uuid::new_v5(&Uuid::NAMESPACE_DNS, id.as_bytes())
}

/// Content blocks for the user message: text first (when non-empty), then images.
pub fn build_content(user_message: &str, images: &[ImageInput]) -> Vec<Value> {
    let mut content = Vec::with_capacity(images.len() + 1);
    if !user_message.is_empty() {
        content.push(json!({"type": "text", "text": user_message}));
    }
    content.extend(
        images
            .iter()
            .map(|img| json!({"type": "image_url", "image_url": img.image_url})),
    );
    content
}

/// Relays messages to one assistant on a LangGraph server.
#[derive(Debug, Clone)]
pub struct Relay {
    client: LangGraphClient,
    assistant_id: String,
    graph_config: Value,
}

impl Relay {
    /// Build from config; fails when `CONFIG` is not a JSON object.
    pub fn new(config: &ParleyConfig) -> Result<Self> {
        let graph_config = config.parsed_graph_config().map_err(|e| {
            error!(error = %e, "Failed to parse CONFIG as JSON");
            e
        })?;
        Ok(Self {
            client: LangGraphClient::new(&config.langgraph_url, config.langgraph_api_key.clone()),
            assistant_id: config.assistant_id.clone(),
            graph_config,
        })
    }

    /// The run request sent for one inbound message.
    pub fn build_request(&self, id: &str, user_message: &str, images: &[ImageInput]) -> RunStreamRequest {
        RunStreamRequest::builder()
            .thread_id(thread_id_for(id).to_string())
            .assistant_id(self.assistant_id.clone())
            .input(json!({
                "messages": [{
                    "role": "user",
                    "content": build_content(user_message, images),
                }]
            }))
            .config(self.graph_config.clone())
            .metadata(json!({"event": "api_call"}))
            .multitask_strategy(MultitaskStrategy::Interrupt)
            .if_not_exists(IfNotExists::Create)
            .stream_mode(StreamMode::Values)
            .build()
    }

    /// Send a message on conversation `id` and return the agent's reply text.
    pub async fn invoke(&self, id: &str, user_message: &str, images: &[ImageInput]) -> Result<String> {
        let request = self.build_request(id, user_message, images);
        info!(
            thread_id = request.thread_id.as_deref().unwrap_or_default(),
            images = images.len(),
            "Invoking agent"
        );

        let final_part = self.stream_to_end(&request).await.map_err(|e| {
            error!(error = %e, "Error during invoke");
            e
        })?;

        Ok(extract_reply(final_part.as_ref()))
    }

    async fn stream_to_end(&self, request: &RunStreamRequest) -> Result<Option<StreamPart>> {
        let mut stream = self.client.runs_stream(request).await?;
        let mut chunks = 0usize;
        let mut final_part = None;
        while let Some(part) = stream.next().await {
            let part = part?;
            chunks += 1;
            debug!(event = %part.event, "received chunk");
            final_part = Some(part);
        }

        info!(
            chunks,
            final_event = final_part.as_ref().map(|p| p.event.as_str()).unwrap_or("none"),
            data_keys = ?final_part.as_ref().map(|p| extract::data_keys(&p.data)).unwrap_or_default(),
            "Run stream finished"
        );
        Ok(final_part)
    }
}
