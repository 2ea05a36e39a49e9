//! ReAct agent graph: model turn, tool turn, repeat until a plain answer.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::config::ParleyConfig;
use crate::error::{ParleyError, Result};
use crate::provider::{ModelProvider, ProviderRequest, ToolDefinition};
use crate::tools::tool::{Tool, ToolExecutionContext};
use crate::tools::ToolArguments;
use crate::types::*;

use super::prompt::CALENDAR_AGENT_PROMPT;

/// Default cap on model turns per invocation.
pub const DEFAULT_MAX_ITERATIONS: usize = 20;

pub const DEFAULT_AGENT_NAME: &str = "calendar_agent";

/// Graph state: the running conversation, excluding the system prompt.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AgentState {
    pub messages: Vec<ModelMessage>,
    pub usage: Usage,
    pub finish_reason: Option<FinishReason>,
}

impl AgentState {
    /// Text of the last assistant message, if any.
    pub fn last_reply(&self) -> Option<String> {
        self.messages
            .iter()
            .rev()
            .find(|m| m.role == Role::Assistant && !m.text().is_empty())
            .map(|m| m.text())
    }
}

/// A compiled ReAct agent.
pub struct ReactAgent {
    name: String,
    provider: Arc<dyn ModelProvider>,
    system_prompt: Option<String>,
    tools: Vec<Arc<dyn Tool>>,
    settings: GenerationSettings,
    max_iterations: usize,
}

/// Build a ReAct agent from a model, a name, a system prompt and tools.
///
/// `tools` may be empty, in which case the graph is a single model call.
pub fn create_react_agent(
    provider: Arc<dyn ModelProvider>,
    name: impl Into<String>,
    prompt: Option<String>,
    tools: Vec<Arc<dyn Tool>>,
) -> ReactAgent {
    ReactAgent {
        name: name.into(),
        provider,
        system_prompt: prompt,
        tools,
        settings: GenerationSettings::default(),
        max_iterations: DEFAULT_MAX_ITERATIONS,
    }
}

/// Build the default calendar agent on Gemini with today's date in its prompt.
#[cfg(feature = "google")]
pub fn build_agent(config: &ParleyConfig) -> Result<ReactAgent> {
    let provider =
        crate::provider::create_google_provider(crate::models::GoogleModel::default(), config)?;
    let today = chrono::Local::now().format("%Y-%m-%d").to_string();
    let prompt = CALENDAR_AGENT_PROMPT.render(&HashMap::from([("today", today)]));
    Ok(create_react_agent(
        Arc::new(provider),
        DEFAULT_AGENT_NAME,
        Some(prompt),
        crate::tools::builtin::all_tools(),
    ))
}

impl ReactAgent {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn system_prompt(&self) -> Option<&str> {
        self.system_prompt.as_deref()
    }

    pub fn tools(&self) -> &[Arc<dyn Tool>] {
        &self.tools
    }

    pub fn with_settings(mut self, settings: GenerationSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations.max(1);
        self
    }

    fn tool_definitions(&self) -> Option<Vec<ToolDefinition>> {
        if self.tools.is_empty() {
            None
        } else {
            Some(self.tools.iter().map(|t| t.definition()).collect())
        }
    }

    /// Run the graph over `messages` until the model answers without tool calls.
    ///
    /// Hitting the iteration cap is not an error: the state is returned with
    /// `FinishReason::Length`.
    pub async fn invoke(&self, messages: Vec<ModelMessage>) -> Result<AgentState> {
        let tool_defs = self.tool_definitions();
        let mut state = AgentState {
            messages,
            ..Default::default()
        };

        for iteration in 0..self.max_iterations {
            let mut request_messages = Vec::with_capacity(state.messages.len() + 1);
            if let Some(ref sys) = self.system_prompt {
                request_messages.push(ModelMessage::system(sys.clone()));
            }
            request_messages.extend(state.messages.iter().cloned());

            let request = ProviderRequest {
                messages: request_messages,
                settings: self.settings.clone(),
                tools: tool_defs.clone(),
            };

            debug!(agent = %self.name, iteration, "calling model");
            let response = self.provider.generate_text(&request).await?;
            state.usage.merge(&response.usage);
            state.finish_reason = response.finish_reason;

            let mut content = Vec::new();
            if !response.text.is_empty() {
                content.push(ContentPart::Text {
                    text: response.text.clone(),
                });
            }
            content.extend(response.tool_calls.iter().cloned().map(ContentPart::ToolCall));
            state.messages.push(ModelMessage {
                role: Role::Assistant,
                content,
                name: Some(self.name.clone()),
                timestamp: Some(chrono::Utc::now()),
            });

            if response.tool_calls.is_empty() {
                info!(agent = %self.name, iterations = iteration + 1, "agent finished");
                return Ok(state);
            }

            for call in &response.tool_calls {
                let result = self.run_tool(call).await;
                state.messages.push(ModelMessage::tool_result(
                    result.tool_call_id,
                    result.tool_name,
                    result.result,
                    result.is_error,
                ));
            }
        }

        warn!(agent = %self.name, max = self.max_iterations, "agent hit iteration limit");
        state.finish_reason = Some(FinishReason::Length);
        Ok(state)
    }

    async fn run_tool(&self, call: &AgentToolCall) -> AgentToolResult {
        let ctx = ToolExecutionContext {
            agent_name: self.name.clone(),
            call_id: call.id.clone(),
        };
        let outcome = match self.tools.iter().find(|t| t.name() == call.name) {
            Some(tool) => {
                debug!(tool = %call.name, "executing tool");
                tool.execute(&ToolArguments::new(call.arguments.clone()), &ctx)
                    .await
            }
            None => Err(ParleyError::ToolExecution {
                tool_name: call.name.clone(),
                message: format!("Tool '{}' not found", call.name),
            }),
        };

        match outcome {
            Ok(result) => AgentToolResult {
                tool_call_id: call.id.clone(),
                tool_name: call.name.clone(),
                result,
                is_error: false,
            },
            Err(e) => {
                warn!(tool = %call.name, error = %e, "Tool execution failed");
                AgentToolResult {
                    tool_call_id: call.id.clone(),
                    tool_name: call.name.clone(),
                    result: serde_json::json!({"error": e.to_string()}),
                    is_error: true,
                }
            }
        }
    }

    /// Send one user message and return the assistant's final text.
    pub async fn reply(&self, message: impl Into<String>) -> Result<String> {
        let state = self.invoke(vec![ModelMessage::user(message)]).await?;
        final_reply(&state)
    }

    /// Like [`reply`](Self::reply), with inline images after the text.
    pub async fn reply_with_images(
        &self,
        message: impl Into<String>,
        images: Vec<ImageContent>,
    ) -> Result<String> {
        let state = self
            .invoke(vec![ModelMessage::user_with_images(message, images)])
            .await?;
        final_reply(&state)
    }
}

fn final_reply(state: &AgentState) -> Result<String> {
    state
        .last_reply()
        .ok_or_else(|| ParleyError::api(200, "Agent produced no reply"))
}

impl std::fmt::Debug for ReactAgent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReactAgent")
            .field("name", &self.name)
            .field("model", &self.provider.model_id())
            .field("tools", &self.tools.iter().map(|t| t.name()).collect::<Vec<_>>())
            .field("max_iterations", &self.max_iterations)
            .finish()
    }
}
