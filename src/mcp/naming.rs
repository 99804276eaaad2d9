//! Flat tool names exposed to the model.
//!
//! A [`ToolId`] is encoded as `<app>_<function>`. Inside each component a
//! `-` is written as `--` and a `_` as `-_`, so the one unescaped `_` is
//! always the separator and decoding is exact for any pair of strings.

use super::types::ToolId;
use crate::error::{BridgeError, Result};

const SEPARATOR: char = '_';
const ESCAPE: char = '-';

pub fn encode_tool_name(id: &ToolId) -> String {
    let mut name = String::with_capacity(id.app.len() + id.function.len() + 1);
    escape_into(&id.app, &mut name);
    name.push(SEPARATOR);
    escape_into(&id.function, &mut name);
    name
}

pub fn decode_tool_name(name: &str) -> Result<ToolId> {
    let invalid = |reason: &str| BridgeError::InvalidToolName {
        name: name.to_string(),
        reason: reason.to_string(),
    };

    let mut parts = vec![String::new()];
    let mut chars = name.chars();
    while let Some(c) = chars.next() {
        match c {
            ESCAPE => match chars.next() {
                Some(escaped @ (ESCAPE | SEPARATOR)) => {
                    if let Some(part) = parts.last_mut() {
                        part.push(escaped);
                    }
                }
                Some(other) => {
                    return Err(invalid(&format!("unknown escape sequence '-{}'", other)))
                }
                None => return Err(invalid("dangling escape character")),
            },
            SEPARATOR => parts.push(String::new()),
            other => {
                if let Some(part) = parts.last_mut() {
                    part.push(other);
                }
            }
        }
    }

    match <[String; 2]>::try_from(parts) {
        Ok([app, function]) if !app.is_empty() && !function.is_empty() => {
            Ok(ToolId { app, function })
        }
        Ok(_) => Err(invalid("app and function must both be non-empty")),
        Err(parts) if parts.len() < 2 => Err(invalid("missing separator")),
        Err(_) => Err(invalid("more than one separator")),
    }
}

fn escape_into(component: &str, out: &mut String) {
    for c in component.chars() {
        if c == ESCAPE || c == SEPARATOR {
            out.push(ESCAPE);
        }
        out.push(c);
    }
}
