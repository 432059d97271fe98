//! Tool System
//!
//! Capability registry: each tool name maps to a typed handler and its input
//! schema. The registry validates arguments against the schema before the
//! handler runs, and converts every failure into an error [`ToolResult`] so
//! nothing escapes to the orchestrator.

use std::collections::HashMap;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use async_trait::async_trait;
use futures::FutureExt;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::caller::CallerContext;
use crate::error::{AgentError, ErrorKind, Result};
use crate::message::ContentBlock;

/// Tool call request from the LLM
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    /// Call ID assigned by the model
    pub id: String,

    /// Tool identifier
    pub name: String,

    /// Structured arguments
    #[serde(default)]
    pub input: Value,
}

impl ToolCall {
    pub fn new(id: impl Into<String>, name: impl Into<String>, input: Value) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            input,
        }
    }

    /// Get an argument as a string
    pub fn arg_str(&self, key: &str) -> Option<&str> {
        self.input.get(key).and_then(Value::as_str)
    }
}

/// What a handler produces on success
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ToolOutput {
    /// One-line human readable summary
    pub summary: String,

    /// Structured payload sent back to the model
    pub payload: Value,
}

impl ToolOutput {
    pub fn new(summary: impl Into<String>, payload: Value) -> Self {
        Self {
            summary: summary.into(),
            payload,
        }
    }

    /// Output with no structured payload
    pub fn text(summary: impl Into<String>) -> Self {
        Self::new(summary, Value::Null)
    }
}

/// Success payload or error marker
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ToolOutcome {
    Success(ToolOutput),
    Error { kind: ErrorKind, message: String },
}

/// Result from tool execution, bound to the call it answers
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ToolResult {
    /// ID of the answered call
    pub tool_call_id: String,

    /// Tool that was called
    pub tool_name: String,

    pub outcome: ToolOutcome,
}

impl ToolResult {
    pub fn success(call: &ToolCall, output: ToolOutput) -> Self {
        Self {
            tool_call_id: call.id.clone(),
            tool_name: call.name.clone(),
            outcome: ToolOutcome::Success(output),
        }
    }

    pub fn failure(call: &ToolCall, kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            tool_call_id: call.id.clone(),
            tool_name: call.name.clone(),
            outcome: ToolOutcome::Error {
                kind,
                message: message.into(),
            },
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self.outcome, ToolOutcome::Success(_))
    }

    /// Error kind, if this is an error result
    pub fn error_kind(&self) -> Option<ErrorKind> {
        match &self.outcome {
            ToolOutcome::Success(_) => None,
            ToolOutcome::Error { kind, .. } => Some(*kind),
        }
    }

    /// Human readable summary, used when the follow-up round yields nothing
    pub fn summary(&self) -> &str {
        match &self.outcome {
            ToolOutcome::Success(output) => &output.summary,
            ToolOutcome::Error { message, .. } => message,
        }
    }

    /// Render as a `tool_result` content block
    pub fn to_block(&self) -> ContentBlock {
        let (content, is_error) = match &self.outcome {
            ToolOutcome::Success(output) if output.payload.is_null() => {
                (output.summary.clone(), false)
            }
            ToolOutcome::Success(output) => (output.payload.to_string(), false),
            ToolOutcome::Error { message, .. } => (message.clone(), true),
        };

        ContentBlock::ToolResult {
            tool_use_id: self.tool_call_id.clone(),
            content,
            is_error,
        }
    }
}

/// Parameter definition for tool schema
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterSchema {
    /// Parameter name
    pub name: String,

    /// JSON Schema type (string, number, boolean, object, array)
    #[serde(rename = "type")]
    pub param_type: String,

    /// Human-readable description
    pub description: String,

    /// Whether this parameter is required
    #[serde(default)]
    pub required: bool,
}

impl ParameterSchema {
    pub fn required(
        name: impl Into<String>,
        param_type: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            param_type: param_type.into(),
            description: description.into(),
            required: true,
        }
    }

    fn accepts(&self, value: &Value) -> bool {
        match self.param_type.as_str() {
            "string" => value.is_string(),
            "number" => value.is_number(),
            "integer" => value.is_i64() || value.is_u64(),
            "boolean" => value.is_boolean(),
            "object" => value.is_object(),
            "array" => value.is_array(),
            _ => true,
        }
    }
}

/// Tool definition schema (for LLM function calling)
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolSchema {
    /// Unique tool identifier
    pub name: String,

    /// Human-readable description (shown to LLM)
    pub description: String,

    /// Parameter definitions
    pub parameters: Vec<ParameterSchema>,
}

impl ToolSchema {
    /// JSON Schema object advertised to the model
    pub fn input_schema(&self) -> Value {
        let properties: serde_json::Map<String, Value> = self
            .parameters
            .iter()
            .map(|p| {
                (
                    p.name.clone(),
                    json!({"type": p.param_type, "description": p.description}),
                )
            })
            .collect();

        let required: Vec<&str> = self
            .parameters
            .iter()
            .filter(|p| p.required)
            .map(|p| p.name.as_str())
            .collect();

        json!({
            "type": "object",
            "properties": properties,
            "required": required,
        })
    }

    /// Check call arguments against this schema
    pub fn validate(&self, input: &Value) -> Result<()> {
        for param in &self.parameters {
            match input.get(&param.name) {
                None | Some(Value::Null) if param.required => {
                    return Err(AgentError::MissingParameter(format!(
                        "{} parameter is required",
                        capitalize(&param.name)
                    )));
                }
                None | Some(Value::Null) => {}
                Some(Value::String(s)) if param.required && s.trim().is_empty() => {
                    return Err(AgentError::MissingParameter(format!(
                        "{} parameter is required",
                        capitalize(&param.name)
                    )));
                }
                Some(value) if !param.accepts(value) => {
                    return Err(AgentError::MissingParameter(format!(
                        "{} parameter must be a {}",
                        capitalize(&param.name),
                        param.param_type
                    )));
                }
                Some(_) => {}
            }
        }
        Ok(())
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Tool trait - implement to add new capabilities
#[async_trait]
pub trait Tool: Send + Sync {
    /// Get the tool's schema for LLM function calling
    fn schema(&self) -> ToolSchema;

    /// Execute the tool. Arguments have already been validated against the schema.
    async fn execute(&self, call: &ToolCall, caller: &CallerContext) -> Result<ToolOutput>;
}

/// Registry for available tools
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn Tool>>,
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
        }
    }

    /// Register a new tool
    pub fn register<T: Tool + 'static>(&mut self, tool: T) {
        let schema = tool.schema();
        self.tools.insert(schema.name, Arc::new(tool));
    }

    /// Register a shared tool
    pub fn register_arc(&mut self, tool: Arc<dyn Tool>) {
        let schema = tool.schema();
        self.tools.insert(schema.name, tool);
    }

    /// Get a tool by name
    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.get(name).cloned()
    }

    /// Execute a tool call.
    ///
    /// Never fails: unknown names, invalid arguments, handler errors and
    /// handler panics all become error results.
    pub async fn execute(&self, call: &ToolCall, caller: &CallerContext) -> ToolResult {
        let Some(tool) = self.get(&call.name) else {
            tracing::warn!(tool = %call.name, "Unknown tool requested");
            return ToolResult::failure(
                call,
                ErrorKind::UnknownTool,
                format!("Unknown tool: {}", call.name),
            );
        };

        // Validate first
        if let Err(e) = tool.schema().validate(&call.input) {
            tracing::debug!(tool = %call.name, error = %e, "Tool arguments rejected");
            return ToolResult::failure(call, e.kind(), message_of(e));
        }

        tracing::debug!(tool = %call.name, id = %call.id, caller = %caller.id, "Executing tool");

        match AssertUnwindSafe(tool.execute(call, caller)).catch_unwind().await {
            Ok(Ok(output)) => ToolResult::success(call, output),
            Ok(Err(e)) => {
                tracing::warn!(tool = %call.name, error = %e, "Tool execution failed");
                let kind = match e.kind() {
                    ErrorKind::MissingParameter => ErrorKind::MissingParameter,
                    _ => ErrorKind::ToolExecutionFailure,
                };
                ToolResult::failure(call, kind, message_of(e))
            }
            Err(_) => {
                tracing::error!(tool = %call.name, "Tool panicked");
                ToolResult::failure(
                    call,
                    ErrorKind::ToolExecutionFailure,
                    format!("Tool '{}' failed unexpectedly", call.name),
                )
            }
        }
    }

    /// All tool schemas, sorted by name
    pub fn schemas(&self) -> Vec<ToolSchema> {
        let mut schemas: Vec<_> = self.tools.values().map(|t| t.schema()).collect();
        schemas.sort_by(|a, b| a.name.cmp(&b.name));
        schemas
    }

    /// Get tool names
    pub fn names(&self) -> Vec<&str> {
        self.tools.keys().map(String::as_str).collect()
    }

    /// Number of registered tools
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

fn message_of(error: AgentError) -> String {
    match error {
        AgentError::MissingParameter(msg) | AgentError::ToolExecution(msg) => msg,
        other => other.to_string(),
    }
}
