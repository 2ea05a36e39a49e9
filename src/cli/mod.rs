//! CLI definitions and logging setup for the `parley` binary.

pub mod logging;

use clap::{Parser, Subcommand};

/// parley CLI
#[derive(Parser, Debug)]
#[command(name = "parley", version, about = "WhatsApp relay for hosted LangGraph agents")]
pub struct Cli {
    /// Log at debug level (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true, env = "LOG_FORMAT_JSON")]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the Twilio WhatsApp webhook server
    Serve(ServeArgs),
    /// Relay one message to the hosted agent and print the reply
    Send(SendArgs),
    /// Chat with the local Gemini calendar agent
    Chat(ChatArgs),
}

#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Port to listen on (overrides PORT)
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Accept webhooks without checking X-Twilio-Signature
    #[arg(long)]
    pub no_signature_check: bool,
}

#[derive(Parser, Debug)]
pub struct SendArgs {
    /// Conversation id; the thread id is derived from it
    #[arg(short, long)]
    pub id: String,

    /// Image URL (https:// or data:) to attach; repeatable
    #[arg(long = "image")]
    pub images: Vec<String>,

    /// Message text
    #[arg(default_value = "")]
    pub message: String,
}

#[derive(Parser, Debug)]
pub struct ChatArgs {
    /// Gemini model id
    #[arg(short, long, default_value = "gemini-2.0-flash-exp")]
    pub model: String,

    /// Replace the calendar system prompt
    #[arg(short, long)]
    pub system: Option<String>,

    /// Temperature (0.0 - 2.0)
    #[arg(short, long)]
    pub temperature: Option<f64>,

    /// Inline image as a `data:<mime>;base64,..` URL; repeatable
    #[arg(long = "image")]
    pub images: Vec<String>,

    /// User prompt
    pub prompt: String,
}
