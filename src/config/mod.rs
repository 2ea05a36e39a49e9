//! Configuration system (layered: code > env > `.env` file).

use std::fmt;

use bon::Builder;

use crate::error::{ParleyError, Result};

pub const DEFAULT_LANGGRAPH_URL: &str = "http://localhost:2024";
pub const DEFAULT_ASSISTANT_ID: &str = "agent";
pub const DEFAULT_PORT: u16 = 8081;

/// Runtime configuration for the relay, the webhook and the local agent.
///
/// Usually loaded with [`ParleyConfig::from_env`]; tests build it directly:
///
/// ```
/// use parley::config::ParleyConfig;
///
/// let config = ParleyConfig::builder()
///     .langgraph_url("http://localhost:9999")
///     .assistant_id("calendar")
///     .build();
/// assert_eq!(config.graph_config, "{}");
/// ```
#[derive(Clone, Builder)]
pub struct ParleyConfig {
    /// Base URL of the LangGraph run service.
    #[builder(into, default = DEFAULT_LANGGRAPH_URL.to_string())]
    pub langgraph_url: String,
    /// Assistant (graph) id runs are submitted to.
    #[builder(into, default = DEFAULT_ASSISTANT_ID.to_string())]
    pub assistant_id: String,
    /// Raw JSON run config forwarded with every run.
    #[builder(into, default = "{}".to_string())]
    pub graph_config: String,
    #[builder(into)]
    pub langgraph_api_key: Option<String>,
    #[builder(into)]
    pub google_api_key: Option<String>,
    #[builder(into)]
    pub google_base_url: Option<String>,
    #[builder(into)]
    pub twilio_auth_token: Option<String>,
    #[builder(into)]
    pub twilio_account_sid: Option<String>,
    /// Reject webhook calls whose `X-Twilio-Signature` does not verify.
    #[builder(default = true)]
    pub validate_signature: bool,
    #[builder(default = DEFAULT_PORT)]
    pub port: u16,
}

impl fmt::Debug for ParleyConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let redact = |v: &Option<String>| v.as_ref().map(|_| "..");
        f.debug_struct("ParleyConfig")
            .field("langgraph_url", &self.langgraph_url)
            .field("assistant_id", &self.assistant_id)
            .field("graph_config", &self.graph_config)
            .field("langgraph_api_key", &redact(&self.langgraph_api_key))
            .field("google_api_key", &redact(&self.google_api_key))
            .field("google_base_url", &self.google_base_url)
            .field("twilio_auth_token", &redact(&self.twilio_auth_token))
            .field("twilio_account_sid", &self.twilio_account_sid)
            .field("validate_signature", &self.validate_signature)
            .field("port", &self.port)
            .finish()
    }
}

impl Default for ParleyConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Read an env var, treating empty values as unset.
fn env_var(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

impl ParleyConfig {
    /// Load from environment variables, reading `.env` first if present.
    pub fn from_env() -> Result<Self> {
        let _ = dotenvy::dotenv(); // load .env if present, ignore error

        let port = match env_var("PORT") {
            Some(raw) => raw
                .parse::<u16>()
                .map_err(|e| ParleyError::Configuration(format!("Invalid PORT '{raw}': {e}")))?,
            None => DEFAULT_PORT,
        };

        let validate_signature = match env_var("TWILIO_VALIDATE_SIGNATURE") {
            Some(raw) => parse_bool(&raw).ok_or_else(|| {
                ParleyError::Configuration(format!("Invalid TWILIO_VALIDATE_SIGNATURE '{raw}'"))
            })?,
            None => true,
        };

        Ok(Self {
            langgraph_url: env_var("LANGGRAPH_URL")
                .unwrap_or_else(|| DEFAULT_LANGGRAPH_URL.to_string()),
            assistant_id: env_var("ASSISTANT_ID")
                .unwrap_or_else(|| DEFAULT_ASSISTANT_ID.to_string()),
            graph_config: env_var("CONFIG").unwrap_or_else(|| "{}".to_string()),
            langgraph_api_key: env_var("LANGGRAPH_API_KEY").or_else(|| env_var("LANGSMITH_API_KEY")),
            google_api_key: env_var("GOOGLE_API_KEY").or_else(|| env_var("GEMINI_API_KEY")),
            google_base_url: env_var("GOOGLE_BASE_URL"),
            twilio_auth_token: env_var("TWILIO_AUTH_TOKEN"),
            twilio_account_sid: env_var("TWILIO_ACCOUNT_SID"),
            validate_signature,
            port,
        })
    }

    /// Parse the run config forwarded to the run service.
    ///
    /// Must be a JSON object; an unparseable value is a configuration error.
    pub fn parsed_graph_config(&self) -> Result<serde_json::Value> {
        let value: serde_json::Value = serde_json::from_str(&self.graph_config)
            .map_err(|e| ParleyError::Configuration(format!("Failed to parse CONFIG as JSON: {e}")))?;
        if !value.is_object() {
            return Err(ParleyError::Configuration(
                "CONFIG must be a JSON object".to_string(),
            ));
        }
        Ok(value)
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
