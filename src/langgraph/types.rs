//! Wire types for the LangGraph run service.

use bon::Builder;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum::{Display, EnumString};

/// What the service does when a run arrives while another is active on the thread.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum MultitaskStrategy {
    Reject,
    Interrupt,
    Rollback,
    Enqueue,
}

/// What the service does when the thread does not exist yet.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum IfNotExists {
    Create,
    Reject,
}

/// Shape of the chunks streamed back.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum StreamMode {
    /// Full graph state after each step.
    Values,
    Messages,
    Updates,
    Events,
    Debug,
    Custom,
}

/// Body of `POST /threads/{thread_id}/runs/stream`.
///
/// `thread_id` travels in the path; without one the run is stateless and goes
/// to `POST /runs/stream`.
#[derive(Debug, Clone, Serialize, Builder, PartialEq)]
pub struct RunStreamRequest {
    #[serde(skip)]
    #[builder(into)]
    pub thread_id: Option<String>,
    #[builder(into)]
    pub assistant_id: String,
    pub input: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub multitask_strategy: Option<MultitaskStrategy>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub if_not_exists: Option<IfNotExists>,
    #[builder(default = StreamMode::Values)]
    pub stream_mode: StreamMode,
}

/// One streamed chunk: the SSE event name and its JSON payload.
#[derive(Debug, Clone, PartialEq)]
pub struct StreamPart {
    pub event: String,
    pub data: Value,
}

impl StreamPart {
    /// Build from raw SSE data; non-JSON payloads are kept as a string.
    pub fn from_raw(event: impl Into<String>, raw: &str) -> Self {
        let data = if raw.is_empty() {
            Value::Null
        } else {
            serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
        };
        Self {
            event: event.into(),
            data,
        }
    }

    /// Whether the payload carries anything: null, `false`, zero and empty
    /// strings, arrays or objects do not.
    pub fn has_data(&self) -> bool {
        match &self.data {
            Value::Null => false,
            Value::Bool(b) => *b,
            Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
            Value::String(s) => !s.is_empty(),
            Value::Array(items) => !items.is_empty(),
            Value::Object(map) => !map.is_empty(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn request_serializes_without_thread_id() {
        let request = RunStreamRequest::builder()
            .thread_id("t-1")
            .assistant_id("agent")
            .input(json!({"messages": []}))
            .multitask_strategy(MultitaskStrategy::Interrupt)
            .if_not_exists(IfNotExists::Create)
            .build();
        let body = serde_json::to_value(&request).unwrap();
        assert!(body.get("thread_id").is_none());
        assert!(body.get("config").is_none());
        assert_eq!(body["multitask_strategy"], "interrupt");
        assert_eq!(body["if_not_exists"], "create");
        assert_eq!(body["stream_mode"], "values");
    }

    #[test]
    fn stream_part_falls_back_to_string_payload() {
        let part = StreamPart::from_raw("error", "boom");
        assert_eq!(part.data, json!("boom"));
        assert!(part.has_data());
        assert!(!StreamPart::from_raw("values", "{}").has_data());
        assert!(!StreamPart::from_raw("values", "").has_data());
    }

    #[test]
    fn falsy_payloads_carry_no_data() {
        for raw in ["null", "false", "0", "0.0", "\"\"", "[]", "{}"] {
            assert!(!StreamPart::from_raw("values", raw).has_data(), "{raw}");
        }
        for raw in ["true", "1", "\"x\"", "[0]", "{\"a\": null}"] {
            assert!(StreamPart::from_raw("values", raw).has_data(), "{raw}");
        }
    }
}
