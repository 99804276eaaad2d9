use crate::api::{ChatClient, ChatRequest, OpenAiClient, ToolChoice};
use crate::config::{Config, PromptSettings};
use crate::error::{BridgeError, Result};
use crate::host::HostContext;
use crate::mcp::{
    decode_tool_name, discover_tools_or_empty, encode_tool_name, McpEndpoint, ToolRegistry,
};
use crate::models::{ExecutionResult, Message, PromptPayload, ToolCall, ToolOutcome};
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::time::timeout;
use tokio_util::sync::CancellationToken;

pub const SYSTEM_PREAMBLE: &str = "You are a helpful assistant with access to various apps via MCP.\n\
Available apps and their functions have been provided as tools you can call.";

const PROMPT_LOG_CHARS: usize = 100;

pub struct OrchestratorContext {
    pub host: HostContext,
    pub config: Config,
    pub cancel: CancellationToken,
    http: reqwest::Client,
    chat: Option<Arc<dyn ChatClient>>,
    mcp_endpoint: Option<McpEndpoint>,
}

impl OrchestratorContext {
    pub fn new(host: HostContext, config: Config) -> Self {
        Self {
            host,
            config,
            cancel: CancellationToken::new(),
            http: reqwest::Client::new(),
            chat: None,
            mcp_endpoint: None,
        }
    }

    /// Uses `chat` instead of an OpenAI client built from the host's API key.
    pub fn with_chat_client(mut self, chat: Arc<dyn ChatClient>) -> Self {
        self.chat = Some(chat);
        self
    }

    /// Uses `endpoint` instead of `localhost:<MCP_PORT>` for discovery.
    pub fn with_mcp_endpoint(mut self, endpoint: McpEndpoint) -> Self {
        self.mcp_endpoint = Some(endpoint);
        self
    }

    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    fn endpoint(&self, settings: &PromptSettings) -> McpEndpoint {
        self.mcp_endpoint
            .clone()
            .unwrap_or_else(|| McpEndpoint::local(&settings.mcp_port))
    }

    fn chat_client(&self, settings: &PromptSettings) -> Result<Arc<dyn ChatClient>> {
        match &self.chat {
            Some(chat) => Ok(chat.clone()),
            None => Ok(Arc::new(OpenAiClient::new(
                &settings.api_key,
                &self.config.api_endpoint,
                self.config.request_timeout,
            )?)),
        }
    }
}

/// Runs one prompt end to end. Never fails: every outcome is an envelope.
pub async fn execute_prompt(context: &OrchestratorContext) -> ExecutionResult {
    // Caller input errors are reported before any network activity.
    if let Err(message) = context.host.platform.validate_params() {
        return ExecutionResult::failure(message);
    }

    match run(context).await {
        Ok(payload) => ExecutionResult::ok(payload),
        Err(e) => {
            context
                .host
                .logger
                .error("Prompt execution failed", json!({ "error": e.to_string() }));
            ExecutionResult::failure(e.to_string())
        }
    }
}

/// Discovery only: reports the tools the model would be offered.
pub async fn list_tools(context: &OrchestratorContext) -> ExecutionResult {
    let logger = context.host.logger.as_ref();
    let settings = PromptSettings::from_platform(context.host.platform.as_ref(), logger);
    let registry = discover_registry(context, &settings).await;

    let tools: Vec<Value> = registry
        .list()
        .iter()
        .map(|tool| {
            json!({
                "name": encode_tool_name(&tool.id()),
                "app": tool.app,
                "function": tool.function,
                "description": tool.description,
            })
        })
        .collect();

    ExecutionResult::ok(json!({ "tools": tools }))
}

async fn run(context: &OrchestratorContext) -> Result<PromptPayload> {
    let platform = context.host.platform.as_ref();
    let logger = context.host.logger.as_ref();

    let prompt = match platform.param("prompt") {
        Some(Value::String(prompt)) => prompt,
        _ => return Err(BridgeError::Validation("Missing required parameter: prompt".to_string())),
    };
    let prompt_context = platform.param("context").unwrap_or_else(|| json!({}));

    logger.info(
        "Executing prompt",
        json!({ "prompt": prompt.chars().take(PROMPT_LOG_CHARS).collect::<String>() }),
    );

    let settings = PromptSettings::from_platform(platform, logger);
    let registry = discover_registry(context, &settings).await;
    let chat = context.chat_client(&settings)?;

    let mut messages = initial_messages(&prompt, &prompt_context)?;
    let tools = registry.schema_entries();

    let request = ChatRequest {
        model: settings.model.clone(),
        messages: messages.clone(),
        tool_choice: tools.as_ref().map(|_| ToolChoice::Auto),
        tools,
        max_tokens: Some(settings.max_tokens),
        temperature: Some(settings.temperature),
    };

    logger.debug(
        "Requesting completion",
        json!({ "model": settings.model, "tools": registry.len() }),
    );
    let message = chat.complete(&request, &context.cancel).await?;

    let tool_calls = message.requested_tool_calls().to_vec();
    if tool_calls.is_empty() {
        return Ok(PromptPayload {
            response: message.content,
            tool_calls: None,
        });
    }

    let outcomes = execute_tool_calls(context, &registry, &tool_calls).await;

    messages.push(message);
    for outcome in &outcomes {
        messages.push(Message::tool(
            outcome.tool_call_id.clone(),
            serde_json::to_string(outcome)?,
        ));
    }

    // The model should answer now, so tools are not offered again.
    let followup = ChatRequest {
        model: settings.model.clone(),
        messages,
        tools: None,
        tool_choice: None,
        max_tokens: Some(settings.max_tokens),
        temperature: None,
    };

    logger.debug(
        "Requesting follow-up completion with tool results",
        json!({ "outcomes": outcomes.len() }),
    );
    let final_message = chat.complete(&followup, &context.cancel).await?;

    Ok(PromptPayload {
        response: final_message.content,
        tool_calls: Some(outcomes),
    })
}

async fn discover_registry(context: &OrchestratorContext, settings: &PromptSettings) -> ToolRegistry {
    let logger = context.host.logger.as_ref();
    let endpoint = context.endpoint(settings);

    let descriptors = discover_tools_or_empty(
        &context.http,
        &endpoint,
        context.config.discovery_timeout,
        &context.cancel,
        logger,
    )
    .await;

    let (registry, duplicates) = ToolRegistry::from_descriptors(descriptors);
    for id in duplicates {
        logger.warn(
            "Ignoring duplicate tool",
            json!({ "app": id.app, "function": id.function }),
        );
    }

    registry
}

fn initial_messages(prompt: &str, prompt_context: &Value) -> Result<Vec<Message>> {
    let system = format!(
        "{}\nContext: {}",
        SYSTEM_PREAMBLE,
        serde_json::to_string(prompt_context)?
    );
    Ok(vec![Message::system(system), Message::user(prompt)])
}

/// Runs every requested call in order. A failing call becomes an error
/// outcome and never stops the rest of the batch.
async fn execute_tool_calls(
    context: &OrchestratorContext,
    registry: &ToolRegistry,
    tool_calls: &[ToolCall],
) -> Vec<ToolOutcome> {
    let mut outcomes = Vec::with_capacity(tool_calls.len());

    for tool_call in tool_calls {
        let outcome = match execute_tool_call(context, registry, tool_call).await {
            Ok(result) => ToolOutcome::success(tool_call.id.clone(), result),
            Err(e) => {
                context.host.logger.warn(
                    "Tool call failed",
                    json!({
                        "tool_call_id": tool_call.id,
                        "tool": tool_call.function.name,
                        "error": e.to_string(),
                    }),
                );
                ToolOutcome::failure(tool_call.id.clone(), e.to_string())
            }
        };
        outcomes.push(outcome);
    }

    outcomes
}

async fn execute_tool_call(
    context: &OrchestratorContext,
    registry: &ToolRegistry,
    tool_call: &ToolCall,
) -> Result<Value> {
    let id = decode_tool_name(&tool_call.function.name)?;
    let arguments = registry.prepare_arguments(&id, &tool_call.function.arguments)?;

    context.host.logger.info(
        "Calling app via MCP",
        json!({ "app": id.app, "function": id.function }),
    );

    let limit = context.config.tool_timeout;
    tokio::select! {
        biased;
        _ = context.cancel.cancelled() => Err(BridgeError::Cancelled),
        result = timeout(limit, context.host.invoker.call(&id, &arguments)) => {
            result
                .map_err(|_| BridgeError::Timeout(limit))?
                .map_err(BridgeError::Invocation)
        }
    }
}
