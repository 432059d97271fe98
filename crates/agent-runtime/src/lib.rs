//! # agent-runtime
//!
//! Model backend providers for the weather-agent system.
//!
//! ## Providers
//!
//! - **Anthropic** (default): Messages API with tool use
//!
//! ## Usage
//!
//! ```rust,ignore
//! use agent_runtime::anthropic::AnthropicProvider;
//!
//! let orchestrator = match AnthropicProvider::from_env()? {
//!     Some(provider) => OrchestratorBuilder::new().provider(Arc::new(provider)),
//!     None => OrchestratorBuilder::new().demo(DemoResponder::from_entropy()),
//! }
//! .build()?;
//! ```

#[cfg(feature = "anthropic")]
pub mod anthropic;

#[cfg(feature = "anthropic")]
pub use anthropic::{AnthropicConfig, AnthropicProvider};

// Re-export core types for convenience
pub use agent_core::{
    AgentError, ChatOrchestrator, LlmProvider, Message, Result, Role, Tool, ToolRegistry,
};
