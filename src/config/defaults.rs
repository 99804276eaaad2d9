pub const DEFAULT_MODEL: &str = "gpt-4-turbo-preview";
pub const DEFAULT_MAX_TOKENS: u32 = 2000;
pub const DEFAULT_TEMPERATURE: f64 = 0.7;
pub const DEFAULT_API_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";

pub fn default_request_timeout() -> u64 {
    120
}

pub fn default_discovery_timeout() -> u64 {
    5
}

pub fn default_tool_timeout() -> u64 {
    60
}
