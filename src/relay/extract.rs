//! Unwrapping the final streamed chunk into reply text.

use serde_json::Value;
use tracing::{error, warn};

use crate::langgraph::StreamPart;

pub const NO_RESPONSE_DATA: &str = "No response data received";
pub const NO_MESSAGES: &str = "No messages found";

/// Turn the last chunk of a `values` stream into the text sent back to the user.
///
/// Prefers the newest assistant message (`role: assistant` or `type: ai`),
/// then the newest message of any kind. Payloads without a `messages` key are
/// returned as JSON text.
pub fn extract_reply(final_part: Option<&StreamPart>) -> String {
    let Some(part) = final_part.filter(|p| p.has_data()) else {
        error!("Final response has no data");
        return NO_RESPONSE_DATA.to_string();
    };

    let Some(messages) = part.data.get("messages") else {
        warn!(
            keys = ?data_keys(&part.data),
            "No 'messages' key found in response data"
        );
        return render_value(&part.data);
    };

    let messages: &[Value] = match messages {
        Value::Array(items) => items,
        other => std::slice::from_ref(other),
    };

    if let Some(reply) = messages.iter().rev().find(|m| is_assistant(m)) {
        return message_content(reply);
    }

    match messages.last() {
        Some(last) => message_content(last),
        None => NO_MESSAGES.to_string(),
    }
}

/// Top-level keys of a JSON object, for logging.
pub fn data_keys(data: &Value) -> Vec<String> {
    data.as_object()
        .map(|map| map.keys().cloned().collect())
        .unwrap_or_default()
}

fn is_assistant(message: &Value) -> bool {
    message.get("role").and_then(Value::as_str) == Some("assistant")
        || message.get("type").and_then(Value::as_str) == Some("ai")
}

fn message_content(message: &Value) -> String {
    match message.get("content") {
        Some(Value::String(text)) => text.clone(),
        Some(Value::Array(blocks)) => {
            let text: Vec<&str> = blocks
                .iter()
                .filter_map(|block| match block {
                    Value::String(s) => Some(s.as_str()),
                    Value::Object(_) if block.get("type").and_then(Value::as_str) == Some("text") => {
                        block.get("text").and_then(Value::as_str)
                    }
                    _ => None,
                })
                .collect();
            if text.is_empty() {
                Value::Array(blocks.clone()).to_string()
            } else {
                text.join("")
            }
        }
        Some(Value::Null) | None => render_value(message),
        Some(other) => render_value(other),
    }
}

fn render_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
