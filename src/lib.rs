//! parley: relay WhatsApp conversations to a hosted LangGraph agent.
//!
//! Two halves live here:
//!
//! - [`relay`] marshals an inbound chat message (text plus images) into a
//!   LangGraph `runs/stream` request, streams the run to completion and turns
//!   the final state into reply text. [`whatsapp`] and [`server`] put a Twilio
//!   webhook in front of it.
//! - [`agent`] defines the agent itself: a ReAct graph over Gemini with a
//!   calendar system prompt and builtin tools.
//!
//! # Quick Start
//!
//! ```no_run
//! use parley::prelude::*;
//!
//! # async fn example() -> parley::error::Result<()> {
//! let config = ParleyConfig::from_env()?;
//! let relay = Relay::new(&config)?;
//! let reply = relay.invoke("whatsapp:+15551234567", "What's on tomorrow?", &[]).await?;
//! println!("{reply}");
//! # Ok(())
//! # }
//! ```

pub mod agent;
pub mod config;
pub mod error;
pub mod langgraph;
pub mod models;
pub mod prelude;
pub mod provider;
pub mod relay;
pub mod tools;
pub mod types;

#[cfg(feature = "server")]
pub mod server;
#[cfg(feature = "server")]
pub mod whatsapp;

#[cfg(feature = "cli")]
pub mod cli;
