use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::fmt;

/// Identity of a discovered tool: the owning app and the function it exposes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ToolId {
    pub app: String,
    pub function: String,
}

impl ToolId {
    pub fn new(app: impl Into<String>, function: impl Into<String>) -> Self {
        Self {
            app: app.into(),
            function: function.into(),
        }
    }
}

impl fmt::Display for ToolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.app, self.function)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDescriptor {
    pub app: String,
    pub function: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_parameters")]
    pub parameters: Value,
}

impl ToolDescriptor {
    pub fn id(&self) -> ToolId {
        ToolId::new(self.app.clone(), self.function.clone())
    }
}

fn default_parameters() -> Value {
    json!({"type": "object", "properties": {}})
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ToolListResponse {
    #[serde(default)]
    pub tools: Option<Vec<ToolDescriptor>>,
}

/// Body posted to the local service's call endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct AppCallRequest<'a> {
    pub app: &'a str,
    pub function: &'a str,
    pub args: Vec<Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppCallResponse {
    #[serde(default)]
    pub result: Option<Value>,
    #[serde(default)]
    pub error: Option<String>,
}
