use crate::error::{BridgeError, Result};
use crate::models::Message;
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
pub struct Choice {
    pub message: Message,
}

/// Parse a non-streaming API response and return the first choice's message
pub fn first_message(response_json: Value) -> Result<Message> {
    if response_json.get("choices").is_none() {
        return Err(BridgeError::Other("No choices in response".to_string()));
    }

    let response: ChatResponse = serde_json::from_value(response_json)?;
    response
        .choices
        .into_iter()
        .next()
        .map(|choice| choice.message)
        .ok_or_else(|| BridgeError::Other("Empty choices array".to_string()))
}
