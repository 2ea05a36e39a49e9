//! Error classification and recovery hints.

/// Broad error category for routing recovery logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Authentication,
    RateLimit,
    Network,
    Server,
    Api,
    Configuration,
    Serialization,
    ToolExecution,
    Unknown,
}

/// Suggested recovery action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecoverySuggestion {
    RetryWithBackoff,
    CheckCredentials,
    CheckConfiguration,
    CheckToolImplementation,
    ContactSupport,
}
