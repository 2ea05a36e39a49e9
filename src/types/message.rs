//! Message types for model communication.

use base64::Engine;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A message in an agent conversation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ModelMessage {
    pub role: Role,
    pub content: Vec<ContentPart>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

impl ModelMessage {
    fn with_parts(role: Role, content: Vec<ContentPart>) -> Self {
        Self {
            role,
            content,
            name: None,
            timestamp: Some(Utc::now()),
        }
    }

    /// Create a system message.
    pub fn system(text: impl Into<String>) -> Self {
        Self::with_parts(Role::System, vec![ContentPart::Text { text: text.into() }])
    }

    /// Create a user message.
    pub fn user(text: impl Into<String>) -> Self {
        Self::with_parts(Role::User, vec![ContentPart::Text { text: text.into() }])
    }

    /// Create a user message carrying text and images.
    ///
    /// An empty text is omitted so image-only messages stay image-only.
    pub fn user_with_images(text: impl Into<String>, images: Vec<ImageContent>) -> Self {
        let text = text.into();
        let mut content = Vec::with_capacity(images.len() + 1);
        if !text.is_empty() {
            content.push(ContentPart::Text { text });
        }
        content.extend(images.into_iter().map(ContentPart::Image));
        Self::with_parts(Role::User, content)
    }

    /// Create a tool result message.
    pub fn tool_result(
        tool_call_id: impl Into<String>,
        tool_name: impl Into<String>,
        result: serde_json::Value,
        is_error: bool,
    ) -> Self {
        Self::with_parts(
            Role::Tool,
            vec![ContentPart::ToolResult(AgentToolResult {
                tool_call_id: tool_call_id.into(),
                tool_name: tool_name.into(),
                result,
                is_error,
            })],
        )
    }

    /// Extract the text content, concatenating all text parts.
    pub fn text(&self) -> String {
        self.content
            .iter()
            .filter_map(|part| match part {
                ContentPart::Text { text } => Some(text.as_str()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("")
    }
}

/// Conversation role.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
    Tool,
}

/// A single part of message content.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    Text { text: String },
    Image(ImageContent),
    ToolCall(AgentToolCall),
    ToolResult(AgentToolResult),
}

/// Inline image content (base64 payload plus MIME type).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ImageContent {
    pub data: String,
    pub mime_type: String,
}

impl ImageContent {
    /// Encode raw bytes.
    pub fn from_bytes(bytes: &[u8], mime_type: impl Into<String>) -> Self {
        Self {
            data: base64::engine::general_purpose::STANDARD.encode(bytes),
            mime_type: mime_type.into(),
        }
    }

    /// Parse a `data:<mime>;base64,<payload>` URL.
    pub fn from_data_url(url: &str) -> Option<Self> {
        let rest = url.strip_prefix("data:")?;
        let (header, data) = rest.split_once(',')?;
        let mime_type = header.strip_suffix(";base64")?;
        if mime_type.is_empty() || data.is_empty() {
            return None;
        }
        Some(Self {
            data: data.to_string(),
            mime_type: mime_type.to_string(),
        })
    }

    /// Render as a `data:` URL.
    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.data)
    }
}

/// A tool call requested by the model.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AgentToolCall {
    pub id: String,
    pub name: String,
    pub arguments: serde_json::Value,
}

/// A tool execution result.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AgentToolResult {
    pub tool_call_id: String,
    /// Name of the tool that produced this result; Gemini keys responses by name.
    pub tool_name: String,
    pub result: serde_json::Value,
    #[serde(default)]
    pub is_error: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_url_round_trips_through_image_content() {
        let image = ImageContent::from_bytes(b"\x89PNG", "image/png");
        let url = image.to_data_url();
        assert!(url.starts_with("data:image/png;base64,"));
        assert_eq!(ImageContent::from_data_url(&url), Some(image));
    }

    #[test]
    fn from_data_url_rejects_plain_urls() {
        assert_eq!(ImageContent::from_data_url("https://example.com/a.png"), None);
        assert_eq!(ImageContent::from_data_url("data:image/png,abc"), None);
    }

    #[test]
    fn user_with_images_skips_empty_text() {
        let image = ImageContent::from_bytes(b"x", "image/jpeg");
        let msg = ModelMessage::user_with_images("", vec![image]);
        assert_eq!(msg.content.len(), 1);
        assert!(matches!(msg.content[0], ContentPart::Image(_)));
    }
}
