//! Local agent definition: a ReAct graph over a hosted model.

pub mod prompt;
pub mod react;

pub use prompt::{PromptTemplate, CALENDAR_AGENT_PROMPT};
#[cfg(feature = "google")]
pub use react::build_agent;
pub use react::{create_react_agent, AgentState, ReactAgent};
