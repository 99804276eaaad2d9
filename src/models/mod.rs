mod message;
mod result;
mod tool;

pub use message::{Message, Role};
pub use result::{ExecutionResult, OutcomeStatus, PromptPayload, ToolOutcome};
pub use tool::{FunctionCall, ToolCall};
