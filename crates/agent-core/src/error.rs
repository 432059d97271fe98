//! Error Types

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for agent operations
pub type Result<T> = std::result::Result<T, AgentError>;

/// Failure taxonomy shared by orchestration and tool results
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    /// Model backend or weather service unreachable or non-success status
    UpstreamUnavailable,
    /// Body did not parse into the expected shape
    MalformedResponse,
    /// Tool name not registered
    UnknownTool,
    /// Required tool argument missing or empty
    MissingParameter,
    /// Tool handler failed
    ToolExecutionFailure,
    /// Anything else (configuration, conversation misuse)
    Internal,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ErrorKind::UpstreamUnavailable => "UpstreamUnavailable",
            ErrorKind::MalformedResponse => "MalformedResponse",
            ErrorKind::UnknownTool => "UnknownTool",
            ErrorKind::MissingParameter => "MissingParameter",
            ErrorKind::ToolExecutionFailure => "ToolExecutionFailure",
            ErrorKind::Internal => "Internal",
        };
        write!(f, "{name}")
    }
}

/// Agent error types
#[derive(Error, Debug)]
pub enum AgentError {
    /// Provider unavailable, network failure, or non-success status
    #[error("Upstream unavailable: {0}")]
    UpstreamUnavailable(String),

    /// Response body failed to parse
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// Tool not found in registry
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    /// Required tool parameter missing
    #[error("Missing parameter: {0}")]
    MissingParameter(String),

    /// Tool execution failed
    #[error("Tool execution error: {0}")]
    ToolExecution(String),

    /// Conversation invariant violated (e.g. orphan tool result)
    #[error("Conversation error: {0}")]
    Conversation(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl AgentError {
    /// Map onto the failure taxonomy
    pub fn kind(&self) -> ErrorKind {
        match self {
            AgentError::UpstreamUnavailable(_) => ErrorKind::UpstreamUnavailable,
            AgentError::MalformedResponse(_) | AgentError::Json(_) => ErrorKind::MalformedResponse,
            AgentError::UnknownTool(_) => ErrorKind::UnknownTool,
            AgentError::MissingParameter(_) => ErrorKind::MissingParameter,
            AgentError::ToolExecution(_) => ErrorKind::ToolExecutionFailure,
            AgentError::Conversation(_) | AgentError::Config(_) => ErrorKind::Internal,
        }
    }

    /// Convert to the text answer returned when this error ends an orchestration
    pub fn user_message(&self) -> String {
        match self {
            AgentError::UpstreamUnavailable(detail) => {
                format!("The AI service is currently unavailable: {detail}")
            }
            AgentError::MalformedResponse(detail) => {
                format!("The AI service returned a response that could not be read: {detail}")
            }
            AgentError::Json(e) => {
                format!("The AI service returned a response that could not be read: {e}")
            }
            AgentError::UnknownTool(name) => format!("Unknown tool: {name}"),
            AgentError::MissingParameter(detail) => format!("Invalid tool input: {detail}"),
            AgentError::ToolExecution(detail) => format!("Tool error: {detail}"),
            AgentError::Conversation(_) | AgentError::Config(_) => {
                "An unexpected error occurred.".into()
            }
        }
    }
}
