use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The single envelope printed for every run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionResult {
    pub success: bool,
    pub data: Option<Value>,
    pub error: Option<String>,
}

impl ExecutionResult {
    pub fn ok(data: impl Serialize) -> Self {
        match serde_json::to_value(data) {
            Ok(data) => Self {
                success: true,
                data: Some(data),
                error: None,
            },
            Err(e) => Self::failure(format!("Failed to serialize result: {}", e)),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| {
            r#"{"success":false,"data":null,"error":"Failed to serialize result"}"#.to_string()
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptPayload {
    pub response: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_calls: Option<Vec<ToolOutcome>>,
}

/// Recorded result of one tool invocation, tagged with the originating call id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolOutcome {
    pub tool_call_id: String,
    #[serde(flatten)]
    pub status: OutcomeStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeStatus {
    Result(Value),
    Error(String),
}

impl ToolOutcome {
    pub fn success(tool_call_id: impl Into<String>, result: Value) -> Self {
        Self {
            tool_call_id: tool_call_id.into(),
            status: OutcomeStatus::Result(result),
        }
    }

    pub fn failure(tool_call_id: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            tool_call_id: tool_call_id.into(),
            status: OutcomeStatus::Error(error.into()),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self.status, OutcomeStatus::Error(_))
    }
}
