pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod host;
pub mod mcp;
pub mod models;
pub mod orchestrator;
