use crate::error::DiscoveryError;
use crate::host::Logger;
use serde_json::json;
use tokio::time::{timeout, Duration};
use tokio_util::sync::CancellationToken;

use super::types::{ToolDescriptor, ToolListResponse};
use super::McpEndpoint;

/// Queries the local registry once. Every failure is reported as a [`DiscoveryError`].
pub async fn discover_tools(
    client: &reqwest::Client,
    endpoint: &McpEndpoint,
    limit: Duration,
    cancel: &CancellationToken,
) -> Result<Vec<ToolDescriptor>, DiscoveryError> {
    let request = async {
        let response = client
            .get(endpoint.tools_url())
            .send()
            .await
            .map_err(DiscoveryError::Unreachable)?;

        if !response.status().is_success() {
            return Err(DiscoveryError::Status(response.status().as_u16()));
        }

        let body: ToolListResponse = response.json().await.map_err(DiscoveryError::Decode)?;
        Ok(body.tools.unwrap_or_default())
    };

    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(DiscoveryError::Cancelled),
        result = timeout(limit, request) => {
            result.map_err(|_| DiscoveryError::Timeout(limit))?
        }
    }
}

/// Discovery as the orchestrator sees it: an unavailable registry means no tools.
pub async fn discover_tools_or_empty(
    client: &reqwest::Client,
    endpoint: &McpEndpoint,
    limit: Duration,
    cancel: &CancellationToken,
    logger: &dyn Logger,
) -> Vec<ToolDescriptor> {
    match discover_tools(client, endpoint, limit, cancel).await {
        Ok(tools) => {
            logger.debug(
                "Discovered MCP tools",
                json!({ "count": tools.len(), "url": endpoint.tools_url() }),
            );
            tools
        }
        Err(e) => {
            logger.debug(
                "Could not discover MCP tools",
                json!({ "error": e.to_string(), "url": endpoint.tools_url() }),
            );
            Vec::new()
        }
    }
}
