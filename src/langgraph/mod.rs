//! Client for a remotely hosted LangGraph agent runtime.

pub mod client;
pub mod sse;
pub mod types;

pub use client::LangGraphClient;
pub use types::{IfNotExists, MultitaskStrategy, RunStreamRequest, StreamMode, StreamPart};
