use crate::host::AppInvoker;
use async_trait::async_trait;
use serde_json::Value;

use super::registry::ToolArguments;
use super::types::{AppCallRequest, AppCallResponse, ToolId};
use super::McpEndpoint;

/// Calls app functions through the local service's HTTP call endpoint.
///
/// This is the edge where named arguments become the positional list the
/// service expects.
pub struct HttpAppInvoker {
    client: reqwest::Client,
    endpoint: McpEndpoint,
}

impl HttpAppInvoker {
    pub fn new(client: reqwest::Client, endpoint: McpEndpoint) -> Self {
        Self { client, endpoint }
    }
}

#[async_trait]
impl AppInvoker for HttpAppInvoker {
    async fn call(&self, tool: &ToolId, arguments: &ToolArguments) -> Result<Value, String> {
        let body = AppCallRequest {
            app: &tool.app,
            function: &tool.function,
            args: arguments.positional(),
        };

        let response = self
            .client
            .post(self.endpoint.call_url())
            .json(&body)
            .send()
            .await
            .map_err(|e| format!("Failed to reach app '{}': {}", tool.app, e))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| format!("Failed to read response from app '{}': {}", tool.app, e))?;

        if !status.is_success() {
            // Prefer the service's own error message when it sent one.
            let message = serde_json::from_str::<AppCallResponse>(&text)
                .ok()
                .and_then(|r| r.error)
                .unwrap_or(text);
            return Err(format!("{} (status {})", message, status.as_u16()));
        }

        let parsed: AppCallResponse = serde_json::from_str(&text)
            .map_err(|e| format!("Invalid response from app '{}': {}", tool.app, e))?;

        match parsed.error {
            Some(error) => Err(error),
            None => Ok(parsed.result.unwrap_or(Value::Null)),
        }
    }
}
