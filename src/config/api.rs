use serde::{Deserialize, Serialize};

use super::defaults::{default_discovery_timeout, default_request_timeout, default_tool_timeout};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiConfig {
    #[serde(default)]
    pub endpoint: Option<String>,
    /// Seconds allowed for each chat completion call.
    #[serde(default = "default_request_timeout")]
    pub request_timeout: u64,
    #[serde(default = "default_discovery_timeout")]
    pub discovery_timeout: u64,
    #[serde(default = "default_tool_timeout")]
    pub tool_timeout: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            request_timeout: default_request_timeout(),
            discovery_timeout: default_discovery_timeout(),
            tool_timeout: default_tool_timeout(),
        }
    }
}

/// Appends the chat completions path when only a base URL was given.
pub fn normalize_endpoint(endpoint: &str) -> String {
    if endpoint.ends_with("/chat/completions") {
        endpoint.to_string()
    } else if endpoint.ends_with("/v1") {
        format!("{}/chat/completions", endpoint)
    } else if endpoint.ends_with("/v1/") {
        format!("{}chat/completions", endpoint)
    } else {
        format!("{}/v1/chat/completions", endpoint.trim_end_matches('/'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_endpoint() {
        assert_eq!(
            normalize_endpoint("http://localhost:11434/v1"),
            "http://localhost:11434/v1/chat/completions"
        );
        assert_eq!(
            normalize_endpoint("http://localhost:11434/v1/"),
            "http://localhost:11434/v1/chat/completions"
        );
        assert_eq!(
            normalize_endpoint("http://localhost:11434/"),
            "http://localhost:11434/v1/chat/completions"
        );
        assert_eq!(
            normalize_endpoint("https://api.openai.com/v1/chat/completions"),
            "https://api.openai.com/v1/chat/completions"
        );
    }
}
