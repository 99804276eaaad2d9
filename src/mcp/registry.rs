use crate::api::models::ToolSchemaEntry;
use crate::error::{BridgeError, Result};
use jsonschema::{Draft, JSONSchema};
use serde_json::{Map, Value};
use std::collections::HashMap;

use super::naming::encode_tool_name;
use super::types::{ToolDescriptor, ToolId};

/// Tools discovered for one run, keyed by [`ToolId`] and kept in discovery order.
#[derive(Debug, Default)]
pub struct ToolRegistry {
    tools: Vec<ToolDescriptor>,
    index: HashMap<ToolId, usize>,
}

impl ToolRegistry {
    /// Builds the registry, returning the ids of any duplicates that were dropped.
    pub fn from_descriptors(descriptors: Vec<ToolDescriptor>) -> (Self, Vec<ToolId>) {
        let mut registry = Self::default();
        let mut duplicates = Vec::new();

        for descriptor in descriptors {
            let id = descriptor.id();
            if registry.index.contains_key(&id) {
                duplicates.push(id);
                continue;
            }
            registry.index.insert(id, registry.tools.len());
            registry.tools.push(descriptor);
        }

        (registry, duplicates)
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn get(&self, id: &ToolId) -> Option<&ToolDescriptor> {
        self.index.get(id).map(|&i| &self.tools[i])
    }

    pub fn list(&self) -> &[ToolDescriptor] {
        &self.tools
    }

    /// Model-facing projection, `None` when no tools are available.
    pub fn schema_entries(&self) -> Option<Vec<ToolSchemaEntry>> {
        if self.tools.is_empty() {
            return None;
        }

        Some(
            self.tools
                .iter()
                .map(|tool| {
                    ToolSchemaEntry::function(
                        encode_tool_name(&tool.id()),
                        tool.description.clone(),
                        tool.parameters.clone(),
                    )
                })
                .collect(),
        )
    }

    /// Parses the model's argument string and checks it against the tool's schema.
    pub fn prepare_arguments(&self, id: &ToolId, arguments: &str) -> Result<ToolArguments> {
        let tool = self
            .get(id)
            .ok_or_else(|| BridgeError::UnknownTool(id.to_string()))?;

        let invalid = |message: String| BridgeError::InvalidArguments {
            tool: id.to_string(),
            message,
        };

        let named = if arguments.trim().is_empty() {
            Map::new()
        } else {
            match serde_json::from_str::<Value>(arguments) {
                Ok(Value::Object(map)) => map,
                Ok(Value::Null) => Map::new(),
                Ok(other) => {
                    return Err(invalid(format!(
                        "expected a JSON object, got {}",
                        json_type_name(&other)
                    )))
                }
                Err(e) => return Err(invalid(format!("failed to parse arguments: {}", e))),
            }
        };

        let schema = JSONSchema::options()
            .with_draft(Draft::Draft7)
            .compile(&tool.parameters)
            .map_err(|e| invalid(format!("invalid parameter schema: {}", e)))?;

        let instance = Value::Object(named.clone());
        if let Err(errors) = schema.validate(&instance) {
            let messages: Vec<String> = errors
                .map(|e| {
                    let path = e.instance_path.to_string();
                    if path.is_empty() {
                        e.to_string()
                    } else {
                        format!("{}: {}", path, e)
                    }
                })
                .collect();
            return Err(invalid(messages.join("; ")));
        }

        Ok(ToolArguments::new(named, declared_parameter_order(&tool.parameters)))
    }
}

/// Named arguments for one call plus the parameter order the tool declares.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolArguments {
    named: Map<String, Value>,
    order: Vec<String>,
}

impl ToolArguments {
    pub fn new(named: Map<String, Value>, order: Vec<String>) -> Self {
        Self { named, order }
    }

    /// Values in declared parameter order. Declared parameters the model left
    /// out become `null` up to the last one supplied; undeclared arguments
    /// follow in the order they were given.
    pub fn positional(&self) -> Vec<Value> {
        let last_supplied = self
            .order
            .iter()
            .rposition(|name| self.named.contains_key(name))
            .map(|i| i + 1)
            .unwrap_or(0);

        let mut values: Vec<Value> = self.order[..last_supplied]
            .iter()
            .map(|name| self.named.get(name).cloned().unwrap_or(Value::Null))
            .collect();

        values.extend(
            self.named
                .iter()
                .filter(|(name, _)| !self.order.contains(name))
                .map(|(_, value)| value.clone()),
        );

        values
    }
}

fn declared_parameter_order(schema: &Value) -> Vec<String> {
    schema
        .get("properties")
        .and_then(|p| p.as_object())
        .map(|properties| properties.keys().cloned().collect())
        .unwrap_or_default()
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
