//! Convenience re-exports for common use.

pub use crate::agent::{create_react_agent, AgentState, ReactAgent};
pub use crate::config::ParleyConfig;
pub use crate::error::{ParleyError, Result};
pub use crate::langgraph::{LangGraphClient, RunStreamRequest, StreamPart};
pub use crate::provider::ModelProvider;
pub use crate::relay::{ImageInput, Relay};
pub use crate::tools::{AgentTool, AgentToolParameters, Tool, ToolArguments};
pub use crate::types::{ContentPart, GenerationSettings, ImageContent, ModelMessage, Role};
