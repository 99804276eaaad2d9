use crate::models::Message;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<Message>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<ToolSchemaEntry>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_choice: Option<ToolChoice>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolChoice {
    Auto,
}

/// A tool as the chat API sees it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolSchemaEntry {
    #[serde(rename = "type")]
    pub tool_type: String,
    pub function: FunctionDefinition,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionDefinition {
    pub name: String,
    pub description: String,
    pub parameters: Value,
}

impl ToolSchemaEntry {
    pub fn function(name: String, description: String, parameters: Value) -> Self {
        Self {
            tool_type: "function".to_string(),
            function: FunctionDefinition {
                name,
                description,
                parameters,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_absent_tools_are_not_serialized() {
        let request = ChatRequest {
            model: "m".to_string(),
            messages: vec![Message::user("hi")],
            tools: None,
            tool_choice: None,
            max_tokens: Some(2000),
            temperature: None,
        };
        let value = serde_json::to_value(&request).unwrap();
        let object = value.as_object().unwrap();
        assert!(!object.contains_key("tools"));
        assert!(!object.contains_key("tool_choice"));
        assert!(!object.contains_key("temperature"));
        assert_eq!(value["max_tokens"], json!(2000));
    }

    #[test]
    fn test_tool_choice_serializes_lowercase() {
        assert_eq!(serde_json::to_value(ToolChoice::Auto).unwrap(), json!("auto"));
    }
}
