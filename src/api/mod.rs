pub mod client;
pub mod models;
pub mod response;

pub use client::{ChatClient, OpenAiClient};
pub use models::{ChatRequest, ToolChoice, ToolSchemaEntry};
