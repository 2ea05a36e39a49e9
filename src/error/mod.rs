//! Error types for parley.

pub mod unified;

pub use unified::{ErrorCategory, RecoverySuggestion};

use thiserror::Error;

/// Primary error type for all parley operations.
#[derive(Error, Debug)]
pub enum ParleyError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Authentication error: {0}")]
    Authentication(String),

    #[error("Rate limited: retry after {retry_after_ms:?}ms")]
    RateLimited { retry_after_ms: Option<u64> },

    #[error("Tool execution error: {tool_name}: {message}")]
    ToolExecution { tool_name: String, message: String },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invalid request signature")]
    InvalidSignature,
}

impl ParleyError {
    /// Create an API error.
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    /// Classify this error into a category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Authentication(_) | Self::InvalidSignature => ErrorCategory::Authentication,
            Self::RateLimited { .. } => ErrorCategory::RateLimit,
            Self::Network(_) => ErrorCategory::Network,
            Self::Configuration(_) => ErrorCategory::Configuration,
            Self::Serialization(_) => ErrorCategory::Serialization,
            Self::Api { status, .. } => match status {
                401 | 403 => ErrorCategory::Authentication,
                429 => ErrorCategory::RateLimit,
                500..=599 => ErrorCategory::Server,
                _ => ErrorCategory::Api,
            },
            Self::ToolExecution { .. } => ErrorCategory::ToolExecution,
            _ => ErrorCategory::Unknown,
        }
    }

    /// Whether this error is potentially retryable by the caller.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self.category(),
            ErrorCategory::RateLimit | ErrorCategory::Network | ErrorCategory::Server
        )
    }

    /// Suggest recovery actions.
    pub fn recovery_suggestion(&self) -> RecoverySuggestion {
        match self.category() {
            ErrorCategory::Authentication => RecoverySuggestion::CheckCredentials,
            ErrorCategory::RateLimit | ErrorCategory::Network | ErrorCategory::Server => {
                RecoverySuggestion::RetryWithBackoff
            }
            ErrorCategory::Configuration => RecoverySuggestion::CheckConfiguration,
            ErrorCategory::ToolExecution => RecoverySuggestion::CheckToolImplementation,
            _ => RecoverySuggestion::ContactSupport,
        }
    }
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, ParleyError>;
