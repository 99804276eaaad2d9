use crate::cli::Args;
use crate::config::FileConfig;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::env;
use std::fs;

use super::Platform;

const VARIABLE_ENV_PREFIX: &str = "PROMPT_BRIDGE_";

/// Host platform backed by command-line arguments, the process environment
/// and the config file.
#[derive(Debug, Default)]
pub struct CliPlatform {
    params: Map<String, Value>,
    param_errors: Vec<String>,
    /// Entries that win over the process environment (e.g. `--mcp-port`).
    env_overrides: HashMap<String, String>,
    /// Entries used when the process environment has no value.
    env_fallbacks: HashMap<String, String>,
    cli_variables: HashMap<String, String>,
    file_variables: HashMap<String, String>,
    inherit_process_env: bool,
}

impl CliPlatform {
    pub fn from_args(args: &Args, file: &FileConfig) -> Self {
        let mut params = Map::new();
        let mut param_errors = Vec::new();

        if let Some(prompt) = args.prompt_text() {
            params.insert("prompt".to_string(), Value::String(prompt));
        }

        match read_context(args) {
            Ok(Some(context)) => {
                params.insert("context".to_string(), context);
            }
            Ok(None) => {}
            Err(e) => param_errors.push(e),
        }

        let cli_variables = match args.parsed_vars() {
            Ok(vars) => vars.into_iter().collect(),
            Err(e) => {
                param_errors.push(e);
                HashMap::new()
            }
        };

        let mut env_overrides = HashMap::new();
        if let Some(port) = &args.mcp_port {
            env_overrides.insert("MCP_PORT".to_string(), port.clone());
        }

        Self {
            params,
            param_errors,
            env_overrides,
            env_fallbacks: file.expanded_env(),
            cli_variables,
            file_variables: file.variables.clone(),
            inherit_process_env: true,
        }
    }

    /// A platform that never reads the process environment.
    pub fn isolated(
        params: Map<String, Value>,
        env: HashMap<String, String>,
        variables: HashMap<String, String>,
    ) -> Self {
        Self {
            params,
            env_overrides: env,
            cli_variables: variables,
            ..Self::default()
        }
    }

    fn process_env(&self, name: &str) -> Option<String> {
        if self.inherit_process_env {
            env::var(name).ok()
        } else {
            None
        }
    }
}

impl Platform for CliPlatform {
    fn param(&self, name: &str) -> Option<Value> {
        self.params.get(name).cloned()
    }

    fn env(&self, name: &str) -> Option<String> {
        self.env_overrides
            .get(name)
            .cloned()
            .or_else(|| self.process_env(name))
            .or_else(|| self.env_fallbacks.get(name).cloned())
    }

    fn variable(&self, name: &str) -> Option<String> {
        // CLI --var > PROMPT_BRIDGE_<NAME> env var > config file
        self.cli_variables
            .get(name)
            .cloned()
            .or_else(|| self.process_env(&format!("{}{}", VARIABLE_ENV_PREFIX, name.to_uppercase())))
            .or_else(|| self.file_variables.get(name).cloned())
    }

    fn validate_params(&self) -> Result<(), String> {
        if let Some(error) = self.param_errors.first() {
            return Err(error.clone());
        }

        match self.params.get("prompt") {
            Some(Value::String(prompt)) if !prompt.trim().is_empty() => Ok(()),
            Some(Value::String(_)) | None => {
                Err("Missing required parameter: prompt".to_string())
            }
            Some(_) => Err("Parameter 'prompt' must be a string".to_string()),
        }
    }
}

fn read_context(args: &Args) -> Result<Option<Value>, String> {
    let raw = match (&args.context, &args.context_file) {
        (Some(raw), _) => raw.clone(),
        (None, Some(path)) => fs::read_to_string(path)
            .map_err(|e| format!("Failed to read context file {}: {}", path.display(), e))?,
        (None, None) => return Ok(None),
    };

    serde_json::from_str(&raw)
        .map(Some)
        .map_err(|e| format!("Parameter 'context' is not valid JSON: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use serde_json::json;

    fn platform(argv: &[&str]) -> CliPlatform {
        let args = Args::parse_from(argv);
        CliPlatform::from_args(&args, &FileConfig::default())
    }

    #[test]
    fn test_missing_prompt_fails_validation() {
        let platform = platform(&["prompt-bridge"]);
        assert_eq!(
            platform.validate_params().unwrap_err(),
            "Missing required parameter: prompt"
        );
    }

    #[test]
    fn test_blank_prompt_fails_validation() {
        let platform = platform(&["prompt-bridge", "--prompt", "   "]);
        assert!(platform.validate_params().is_err());
    }

    #[test]
    fn test_context_is_parsed() {
        let platform = platform(&["prompt-bridge", "--context", r#"{"user":"ana"}"#, "hi"]);
        assert!(platform.validate_params().is_ok());
        assert_eq!(platform.param("context"), Some(json!({"user": "ana"})));
    }

    #[test]
    fn test_invalid_context_fails_validation() {
        let platform = platform(&["prompt-bridge", "--context", "{nope", "hi"]);
        assert!(platform
            .validate_params()
            .unwrap_err()
            .contains("not valid JSON"));
    }

    #[test]
    fn test_cli_variables_win_over_file() {
        let args = Args::parse_from(["prompt-bridge", "--var", "model=cli-model", "hi"]);
        let mut file = FileConfig::default();
        file.variables
            .insert("model".to_string(), "file-model".to_string());
        file.variables
            .insert("max_tokens".to_string(), "512".to_string());

        let platform = CliPlatform::from_args(&args, &file);
        assert_eq!(platform.variable("model").as_deref(), Some("cli-model"));
        assert_eq!(platform.variable("max_tokens").as_deref(), Some("512"));
    }

    #[test]
    fn test_mcp_port_flag_overrides_env() {
        let platform = platform(&["prompt-bridge", "--mcp-port", "9123", "hi"]);
        assert_eq!(platform.env("MCP_PORT").as_deref(), Some("9123"));
    }

    #[test]
    fn test_isolated_platform_ignores_process_env() {
        env::set_var("PROMPT_BRIDGE_ISOLATION_CHECK", "leaked");
        let platform = CliPlatform::isolated(Map::new(), HashMap::new(), HashMap::new());
        assert!(platform.env("PROMPT_BRIDGE_ISOLATION_CHECK").is_none());
    }
}
