pub mod discovery;
pub mod invoker;
pub mod naming;
pub mod registry;
pub mod types;

pub use discovery::{discover_tools, discover_tools_or_empty};
pub use invoker::HttpAppInvoker;
pub use naming::{decode_tool_name, encode_tool_name};
pub use registry::{ToolArguments, ToolRegistry};
pub use types::{ToolDescriptor, ToolId};

pub const DEFAULT_MCP_PORT: &str = "9000";

/// Base address of the local service that lists and runs tools.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct McpEndpoint {
    base_url: String,
}

impl McpEndpoint {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn local(port: &str) -> Self {
        Self::new(format!("http://localhost:{}", port))
    }

    pub fn tools_url(&self) -> String {
        format!("{}/mcp/tools", self.base_url)
    }

    pub fn call_url(&self) -> String {
        format!("{}/mcp/call", self.base_url)
    }
}
