use clap::Parser;
use prompt_bridge::cli::Args;
use prompt_bridge::config::{init_config_file, Config, FileConfig};
use prompt_bridge::host::{init_tracing, CliPlatform, HostContext, Platform, TracingLogger};
use prompt_bridge::mcp::{HttpAppInvoker, McpEndpoint, DEFAULT_MCP_PORT};
use prompt_bridge::models::ExecutionResult;
use prompt_bridge::orchestrator::{execute_prompt, list_tools, OrchestratorContext};
use serde_json::json;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() {
    let args = Args::parse();
    let result = run(args).await;
    println!("{}", result.to_json());
}

async fn run(args: Args) -> ExecutionResult {
    if args.config_init {
        init_tracing(args.verbose, args.quiet);
        return match init_config_file() {
            Ok(path) => ExecutionResult::ok(json!({ "config_path": path.display().to_string() })),
            Err(e) => ExecutionResult::failure(format!("{:#}", e)),
        };
    }

    let file = match FileConfig::load(args.config.as_deref()) {
        Ok(file) => file,
        Err(e) => {
            init_tracing(args.verbose, args.quiet);
            tracing::error!(error = %format!("{:#}", e), "Failed to load configuration");
            return ExecutionResult::failure(format!("{:#}", e));
        }
    };

    let config = Config::from_env_and_args(&args, &file);
    init_tracing(config.verbose, args.quiet);

    let platform = Arc::new(CliPlatform::from_args(&args, &file));
    let port = platform
        .env("MCP_PORT")
        .filter(|p| !p.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_MCP_PORT.to_string());
    let invoker = Arc::new(HttpAppInvoker::new(
        reqwest::Client::new(),
        McpEndpoint::local(&port),
    ));
    let host = HostContext::new(platform, Arc::new(TracingLogger), invoker);

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupted, cancelling pending requests");
            on_interrupt.cancel();
        }
    });

    let context = OrchestratorContext::new(host, config).with_cancellation(cancel);

    if args.list_tools {
        list_tools(&context).await
    } else {
        execute_prompt(&context).await
    }
}
