//! Typed access to tool call arguments.

use crate::error::{ParleyError, Result};

/// Wrapper around tool call arguments providing typed extraction.
#[derive(Debug, Clone)]
pub struct ToolArguments {
    value: serde_json::Value,
}

impl ToolArguments {
    pub fn new(value: serde_json::Value) -> Self {
        Self { value }
    }

    pub fn get_str(&self, key: &str) -> Result<&str> {
        self.value
            .get(key)
            .and_then(|v| v.as_str())
            .ok_or_else(|| ParleyError::InvalidArgument(format!("Missing string argument: {key}")))
    }

    pub fn get_f64_opt(&self, key: &str) -> Option<f64> {
        self.value.get(key).and_then(|v| v.as_f64())
    }
}
