mod api;
pub mod defaults;
mod validation;
mod variables;

use crate::cli::Args;
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub use api::{normalize_endpoint, ApiConfig};
pub use validation::{expand_env_var_in_string, expand_env_vars};
pub use variables::PromptSettings;

const CONFIG_FILE_STEM: &str = "prompt-bridge";

const EXAMPLE_CONFIG: &str = r#"# prompt-bridge configuration
api:
  # Base URL or full chat completions URL of an OpenAI-compatible API
  endpoint: https://api.openai.com/v1
  # Timeouts in seconds
  request_timeout: 120
  discovery_timeout: 5
  tool_timeout: 60

# Variables read by the orchestrator (CLI --var and PROMPT_BRIDGE_<KEY> win)
variables:
  model: gpt-4-turbo-preview
  max_tokens: "2000"
  temperature: "0.7"

# Extra environment entries; ${VAR} references are expanded
env:
  MCP_PORT: "9000"
  OPENAI_API_KEY: ${OPENAI_API_KEY}

logging:
  verbose: false
"#;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct LoggingConfig {
    #[serde(default)]
    pub verbose: Option<bool>,
}

/// Contents of the YAML (or legacy JSON) config file.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct FileConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub variables: HashMap<String, String>,
    #[serde(default)]
    pub env: HashMap<String, String>,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Process-level settings: where the model lives and how long calls may take.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub api_endpoint: String,
    pub request_timeout: Duration,
    pub discovery_timeout: Duration,
    pub tool_timeout: Duration,
    pub verbose: bool,
}

impl Default for Config {
    fn default() -> Self {
        let api = ApiConfig::default();
        Self {
            api_endpoint: defaults::DEFAULT_API_ENDPOINT.to_string(),
            request_timeout: Duration::from_secs(api.request_timeout),
            discovery_timeout: Duration::from_secs(api.discovery_timeout),
            tool_timeout: Duration::from_secs(api.tool_timeout),
            verbose: false,
        }
    }
}

impl Config {
    pub fn from_env_and_args(args: &Args, file: &FileConfig) -> Self {
        // Endpoint: CLI args > env var > config file > default
        let api_endpoint = args
            .api_endpoint
            .clone()
            .or_else(|| env::var("OPENAI_BASE_URL").ok())
            .or(file.api.endpoint.clone())
            .map(|endpoint| normalize_endpoint(&endpoint))
            .unwrap_or_else(|| defaults::DEFAULT_API_ENDPOINT.to_string());

        let seconds = |var: &str, fallback: u64| {
            Duration::from_secs(
                env::var(var)
                    .ok()
                    .and_then(|s| s.parse::<u64>().ok())
                    .unwrap_or(fallback),
            )
        };

        let verbose = args.verbose
            || env::var("PROMPT_BRIDGE_VERBOSE")
                .ok()
                .map(|v| matches!(v.to_lowercase().as_str(), "true" | "1" | "yes"))
                .or(file.logging.verbose)
                .unwrap_or(false);

        Config {
            api_endpoint,
            request_timeout: seconds("PROMPT_BRIDGE_REQUEST_TIMEOUT", file.api.request_timeout),
            discovery_timeout: seconds(
                "PROMPT_BRIDGE_DISCOVERY_TIMEOUT",
                file.api.discovery_timeout,
            ),
            tool_timeout: seconds("PROMPT_BRIDGE_TOOL_TIMEOUT", file.api.tool_timeout),
            verbose,
        }
    }
}

impl FileConfig {
    /// Loads `explicit` when given, otherwise the first config file found.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            if !path.exists() {
                bail!("Config file not found: {}", path.display());
            }
            return Self::load_from(path);
        }

        for path in Self::get_config_paths() {
            if path.exists() {
                return Self::load_from(&path);
            }
        }

        Ok(FileConfig::default())
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let extension = path.extension().and_then(|s| s.to_str());
        if extension == Some("json") {
            serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse JSON config file: {}", path.display()))
        } else {
            serde_yaml::from_str(&contents)
                .with_context(|| format!("Failed to parse YAML config file: {}", path.display()))
        }
    }

    pub fn get_config_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();

        // 1. Current directory (local override)
        for ext in ["yaml", "yml", "json"] {
            paths.push(PathBuf::from(format!(".{}.{}", CONFIG_FILE_STEM, ext)));
        }

        // 2. User's config directory
        if let Some(config_dir) = user_config_dir() {
            for ext in ["yaml", "yml", "json"] {
                paths.push(config_dir.join(format!("{}.{}", CONFIG_FILE_STEM, ext)));
            }
        }

        paths
    }

    /// The `env:` section with `${VAR}` references expanded.
    pub fn expanded_env(&self) -> HashMap<String, String> {
        expand_env_vars(&self.env)
    }
}

fn user_config_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".config").join(CONFIG_FILE_STEM))
}

/// Writes the example config to the user config directory, refusing to overwrite.
pub fn init_config_file() -> Result<PathBuf> {
    let dir = user_config_dir().context("Could not determine home directory")?;
    write_example_config(&dir)
}

pub fn write_example_config(dir: &Path) -> Result<PathBuf> {
    let path = dir.join(format!("{}.yaml", CONFIG_FILE_STEM));
    if path.exists() {
        bail!("Config file already exists: {}", path.display());
    }

    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create config directory: {}", dir.display()))?;
    fs::write(&path, EXAMPLE_CONFIG)
        .with_context(|| format!("Failed to write config file: {}", path.display()))?;

    Ok(path)
}
