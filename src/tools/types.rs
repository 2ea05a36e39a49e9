//! Parameter schemas for tools.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

/// JSON Schema-based parameter definition for a tool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentToolParameters {
    pub schema: Value,
}

impl AgentToolParameters {
    /// A tool that takes no parameters.
    pub fn empty() -> Self {
        Self::object().build()
    }

    /// Start an object schema.
    pub fn object() -> ParameterBuilder {
        ParameterBuilder {
            properties: Map::new(),
            required: Vec::new(),
        }
    }
}

/// Builder for object parameter schemas.
pub struct ParameterBuilder {
    properties: Map<String, Value>,
    required: Vec<String>,
}

impl ParameterBuilder {
    fn property(mut self, name: String, schema: Value, required: bool) -> Self {
        if required {
            self.required.push(name.clone());
        }
        self.properties.insert(name, schema);
        self
    }

    pub fn string(self, name: impl Into<String>, description: impl Into<String>, required: bool) -> Self {
        let schema = json!({"type": "string", "description": description.into()});
        self.property(name.into(), schema, required)
    }

    pub fn number(self, name: impl Into<String>, description: impl Into<String>, required: bool) -> Self {
        let schema = json!({"type": "number", "description": description.into()});
        self.property(name.into(), schema, required)
    }

    pub fn build(self) -> AgentToolParameters {
        AgentToolParameters {
            schema: json!({
                "type": "object",
                "properties": self.properties,
                "required": self.required,
            }),
        }
    }
}
