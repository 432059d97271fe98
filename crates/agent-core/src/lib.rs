//! # agent-core
//!
//! Tool-augmented chat orchestration with a provider-agnostic model backend
//! and a schema-validated tool registry.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                      ChatOrchestrator                         │
//! │  ┌──────────────┐  ┌──────────────┐  ┌───────────────────┐   │
//! │  │ Conversation │  │ ToolRegistry │  │  LlmProvider      │   │
//! │  │ (one call)   │──│ (validated)  │──│  or DemoResponder │   │
//! │  └──────────────┘  └──────────────┘  └───────────────────┘   │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! The `LlmProvider` trait keeps the orchestrator independent of the
//! backend; `DemoResponder` stands in for it when no credential is set.

pub mod caller;
pub mod demo;
pub mod error;
pub mod message;
pub mod orchestrator;
pub mod provider;
pub mod stream;
pub mod tool;

pub use caller::CallerContext;
pub use demo::DemoResponder;
pub use error::{AgentError, ErrorKind, Result};
pub use message::{ContentBlock, Conversation, Message, Role};
pub use orchestrator::{
    ChatOrchestrator, ChatReply, ChatRequest, OrchestratorBuilder, OrchestratorConfig, ReplyKind,
};
pub use provider::{Completion, CompletionRequest, GenerationOptions, LlmProvider};
pub use stream::{StreamFrame, pace_words};
pub use tool::{ParameterSchema, Tool, ToolCall, ToolOutput, ToolRegistry, ToolResult, ToolSchema};
