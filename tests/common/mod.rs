#![allow(dead_code)]

use async_trait::async_trait;
use prompt_bridge::api::{ChatClient, ChatRequest};
use prompt_bridge::config::Config;
use prompt_bridge::error::{BridgeError, Result};
use prompt_bridge::host::{AppInvoker, HostContext, LogLevel, Logger, Platform};
use prompt_bridge::mcp::{McpEndpoint, ToolArguments, ToolId};
use prompt_bridge::models::{FunctionCall, Message, Role, ToolCall};
use prompt_bridge::orchestrator::OrchestratorContext;
use serde_json::{Map, Value};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

#[derive(Default)]
pub struct FakePlatform {
    params: Map<String, Value>,
    env: HashMap<String, String>,
    variables: HashMap<String, String>,
}

impl FakePlatform {
    pub fn with_prompt(prompt: &str) -> Self {
        Self::default().param("prompt", Value::String(prompt.to_string()))
    }

    pub fn param(mut self, name: &str, value: Value) -> Self {
        self.params.insert(name.to_string(), value);
        self
    }

    pub fn env(mut self, name: &str, value: &str) -> Self {
        self.env.insert(name.to_string(), value.to_string());
        self
    }

    pub fn variable(mut self, name: &str, value: &str) -> Self {
        self.variables.insert(name.to_string(), value.to_string());
        self
    }
}

impl Platform for FakePlatform {
    fn param(&self, name: &str) -> Option<Value> {
        self.params.get(name).cloned()
    }

    fn env(&self, name: &str) -> Option<String> {
        self.env.get(name).cloned()
    }

    fn variable(&self, name: &str) -> Option<String> {
        self.variables.get(name).cloned()
    }

    fn validate_params(&self) -> std::result::Result<(), String> {
        match self.params.get("prompt") {
            Some(Value::String(p)) if !p.trim().is_empty() => Ok(()),
            _ => Err("Missing required parameter: prompt".to_string()),
        }
    }
}

#[derive(Default)]
pub struct RecordingLogger {
    records: Mutex<Vec<(LogLevel, String, Value)>>,
}

impl RecordingLogger {
    pub fn records(&self) -> Vec<(LogLevel, String, Value)> {
        self.records.lock().unwrap().clone()
    }

    pub fn has(&self, level: LogLevel, message: &str) -> bool {
        self.records()
            .iter()
            .any(|(l, m, _)| *l == level && m == message)
    }
}

impl Logger for RecordingLogger {
    fn log(&self, level: LogLevel, message: &str, metadata: Value) {
        self.records
            .lock()
            .unwrap()
            .push((level, message.to_string(), metadata));
    }
}

/// Answers calls from a fixed table and records what it was asked.
#[derive(Default)]
pub struct FakeInvoker {
    responses: HashMap<ToolId, std::result::Result<Value, String>>,
    delays: HashMap<ToolId, Duration>,
    cancel_on: Option<(ToolId, CancellationToken)>,
    calls: Mutex<Vec<(ToolId, Vec<Value>)>>,
}

impl FakeInvoker {
    pub fn respond(mut self, app: &str, function: &str, result: Value) -> Self {
        self.responses.insert(ToolId::new(app, function), Ok(result));
        self
    }

    pub fn fail(mut self, app: &str, function: &str, error: &str) -> Self {
        self.responses
            .insert(ToolId::new(app, function), Err(error.to_string()));
        self
    }

    /// Holds the answer for `app/function` back by `delay`.
    pub fn delay(mut self, app: &str, function: &str, delay: Duration) -> Self {
        self.delays.insert(ToolId::new(app, function), delay);
        self
    }

    /// Cancels `token` as soon as `app/function` is called.
    pub fn cancel_during(mut self, app: &str, function: &str, token: CancellationToken) -> Self {
        self.cancel_on = Some((ToolId::new(app, function), token));
        self
    }

    pub fn calls(&self) -> Vec<(ToolId, Vec<Value>)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl AppInvoker for FakeInvoker {
    async fn call(
        &self,
        tool: &ToolId,
        arguments: &ToolArguments,
    ) -> std::result::Result<Value, String> {
        self.calls
            .lock()
            .unwrap()
            .push((tool.clone(), arguments.positional()));
        if let Some((target, token)) = &self.cancel_on {
            if target == tool {
                token.cancel();
            }
        }
        if let Some(delay) = self.delays.get(tool) {
            tokio::time::sleep(*delay).await;
        }
        self.responses
            .get(tool)
            .cloned()
            .unwrap_or_else(|| Err(format!("no such function {}", tool)))
    }
}

/// Replays canned assistant messages and keeps every request body it saw.
#[derive(Default)]
pub struct ScriptedChat {
    replies: Mutex<VecDeque<Message>>,
    requests: Mutex<Vec<Value>>,
}

impl ScriptedChat {
    pub fn new(replies: Vec<Message>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<Value> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatClient for ScriptedChat {
    async fn complete(
        &self,
        request: &ChatRequest,
        _cancel: &CancellationToken,
    ) -> Result<Message> {
        self.requests
            .lock()
            .unwrap()
            .push(serde_json::to_value(request).unwrap());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| BridgeError::Api {
                status: 500,
                message: "no scripted reply".to_string(),
            })
    }
}

pub fn assistant_text(text: &str) -> Message {
    Message {
        role: Role::Assistant,
        content: Some(text.to_string()),
        tool_calls: None,
        tool_call_id: None,
    }
}

pub fn assistant_tool_calls(calls: &[(&str, &str, &str)]) -> Message {
    Message {
        role: Role::Assistant,
        content: None,
        tool_calls: Some(
            calls
                .iter()
                .map(|(id, name, arguments)| ToolCall {
                    id: id.to_string(),
                    tool_type: "function".to_string(),
                    function: FunctionCall {
                        name: name.to_string(),
                        arguments: arguments.to_string(),
                    },
                })
                .collect(),
        ),
        tool_call_id: None,
    }
}

pub struct Harness {
    pub logger: Arc<RecordingLogger>,
    pub invoker: Arc<FakeInvoker>,
    pub chat: Arc<ScriptedChat>,
    pub context: OrchestratorContext,
}

pub fn harness(
    platform: FakePlatform,
    invoker: FakeInvoker,
    chat: ScriptedChat,
    mcp_base_url: &str,
) -> Harness {
    harness_with_config(platform, invoker, chat, mcp_base_url, Config::default())
}

pub fn harness_with_config(
    platform: FakePlatform,
    invoker: FakeInvoker,
    chat: ScriptedChat,
    mcp_base_url: &str,
    config: Config,
) -> Harness {
    let logger = Arc::new(RecordingLogger::default());
    let invoker = Arc::new(invoker);
    let chat = Arc::new(chat);

    let host = HostContext::new(Arc::new(platform), logger.clone(), invoker.clone());
    let context = OrchestratorContext::new(host, config)
        .with_chat_client(chat.clone())
        .with_mcp_endpoint(McpEndpoint::new(mcp_base_url));

    Harness {
        logger,
        invoker,
        chat,
        context,
    }
}

/// Config with short limits so timeout paths finish quickly.
pub fn config_with_timeouts(discovery: Duration, tool: Duration) -> Config {
    Config {
        discovery_timeout: discovery,
        tool_timeout: tool,
        ..Config::default()
    }
}

/// A response body that only arrives after `delay`.
pub fn slow_body(
    delay: Duration,
    body: String,
) -> impl Fn(&mut dyn std::io::Write) -> std::io::Result<()> + Send + Sync + 'static {
    move |writer| {
        std::thread::sleep(delay);
        writer.write_all(body.as_bytes())
    }
}

/// An address nothing listens on.
pub const UNREACHABLE_MCP: &str = "http://127.0.0.1:1";
