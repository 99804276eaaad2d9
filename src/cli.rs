use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Default, Clone)]
#[command(name = "prompt-bridge")]
#[command(
    about = "Send one prompt to a chat model with locally discovered MCP tools and print a JSON result",
    long_about = None
)]
pub struct Args {
    #[arg(long = "prompt", help = "Prompt to send (alternative to trailing words)")]
    pub prompt: Option<String>,

    #[arg(long = "context", help = "Context object as a JSON string")]
    pub context: Option<String>,

    #[arg(
        long = "context-file",
        conflicts_with = "context",
        help = "Read the context object from a JSON file"
    )]
    pub context_file: Option<PathBuf>,

    #[arg(
        long = "var",
        value_name = "KEY=VALUE",
        help = "Set a variable such as model, max_tokens or temperature"
    )]
    pub vars: Vec<String>,

    #[arg(long = "config", help = "Path to a YAML or JSON config file")]
    pub config: Option<PathBuf>,

    #[arg(
        long = "api-endpoint",
        help = "Custom API base URL (e.g., http://localhost:11434/v1)"
    )]
    pub api_endpoint: Option<String>,

    #[arg(long = "mcp-port", help = "Port of the local MCP service (overrides MCP_PORT)")]
    pub mcp_port: Option<String>,

    #[arg(long = "list-tools", help = "Only discover tools and print them")]
    pub list_tools: bool,

    #[arg(long = "config-init", help = "Write an example config file and exit")]
    pub config_init: bool,

    #[arg(short = 'v', long = "verbose", help = "Enable debug logging on stderr")]
    pub verbose: bool,

    #[arg(
        short = 'q',
        long = "quiet",
        conflicts_with = "verbose",
        help = "Only log warnings and errors"
    )]
    pub quiet: bool,

    #[arg(help = "Prompt to send to the model")]
    pub words: Vec<String>,
}

impl Args {
    /// `--prompt` wins over trailing words; `None` when neither was given.
    pub fn prompt_text(&self) -> Option<String> {
        self.prompt.clone().or_else(|| {
            if self.words.is_empty() {
                None
            } else {
                Some(self.words.join(" "))
            }
        })
    }

    /// Parses `--var key=value` pairs, rejecting entries without `=`.
    pub fn parsed_vars(&self) -> Result<Vec<(String, String)>, String> {
        self.vars
            .iter()
            .map(|entry| {
                entry
                    .split_once('=')
                    .map(|(k, v)| (k.trim().to_string(), v.to_string()))
                    .filter(|(k, _)| !k.is_empty())
                    .ok_or_else(|| format!("Invalid --var '{}': expected KEY=VALUE", entry))
            })
            .collect()
    }
}
