use crate::host::{Logger, Platform};
use crate::mcp::DEFAULT_MCP_PORT;
use serde_json::json;
use std::str::FromStr;

use super::defaults::{DEFAULT_MAX_TOKENS, DEFAULT_MODEL, DEFAULT_TEMPERATURE};

/// Per-run settings read from the host's environment and variables.
#[derive(Clone, PartialEq)]
pub struct PromptSettings {
    pub api_key: String,
    pub mcp_port: String,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f64,
}

impl std::fmt::Debug for PromptSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PromptSettings")
            .field("api_key", &"<redacted>")
            .field("mcp_port", &self.mcp_port)
            .field("model", &self.model)
            .field("max_tokens", &self.max_tokens)
            .field("temperature", &self.temperature)
            .finish()
    }
}

impl PromptSettings {
    pub fn from_platform(platform: &dyn Platform, logger: &dyn Logger) -> Self {
        let api_key = platform.env("OPENAI_API_KEY").unwrap_or_default();
        let mcp_port = platform
            .env("MCP_PORT")
            .filter(|p| !p.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_MCP_PORT.to_string());
        let model = platform
            .variable("model")
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());

        Self {
            api_key,
            mcp_port,
            model,
            max_tokens: parse_variable(platform, logger, "max_tokens", DEFAULT_MAX_TOKENS),
            temperature: parse_variable(platform, logger, "temperature", DEFAULT_TEMPERATURE),
        }
    }
}

fn parse_variable<T>(platform: &dyn Platform, logger: &dyn Logger, name: &str, default: T) -> T
where
    T: FromStr + Copy + serde::Serialize,
{
    let Some(raw) = platform.variable(name) else {
        return default;
    };

    match raw.trim().parse::<T>() {
        Ok(value) => value,
        Err(_) => {
            logger.warn(
                "Ignoring unparsable variable",
                json!({ "variable": name, "value": raw, "default": default }),
            );
            default
        }
    }
}
