//! Anthropic LLM Provider
//!
//! Implementation of `LlmProvider` over the Anthropic Messages API.

use std::time::Duration;

use agent_core::{
    error::{AgentError, Result},
    message::{ContentBlock, Message, Role},
    provider::{
        Completion, CompletionRequest, DEFAULT_MODEL, FinishReason, LlmProvider, ModelInfo,
        ProviderInfo, TokenUsage,
    },
    tool::ToolSchema,
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// API version sent with every request
pub const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Value of `ANTHROPIC_API_KEY` that selects demo mode
pub const DEMO_KEY: &str = "demo";

const KNOWN_MODELS: [(&str, &str); 4] = [
    ("claude-3-5-sonnet-20241022", "Claude 3.5 Sonnet"),
    ("claude-3-sonnet-20240229", "Claude 3 Sonnet"),
    ("claude-3-haiku-20240307", "Claude 3 Haiku"),
    ("claude-3-opus-20240229", "Claude 3 Opus"),
];

/// Anthropic provider configuration
#[derive(Clone)]
pub struct AnthropicConfig {
    /// API key
    pub api_key: String,

    /// API base URL
    pub base_url: String,

    /// Model identifier
    pub model: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,

    /// Token limit per exchange
    pub max_tokens: u32,
}

impl AnthropicConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: "https://api.anthropic.com".into(),
            model: DEFAULT_MODEL.into(),
            timeout_secs: 60,
            max_tokens: 1000,
        }
    }

    /// Read configuration from the environment.
    ///
    /// Returns `None` when no usable key is set (absent, empty, or `demo`).
    pub fn from_env() -> Option<Self> {
        let api_key = std::env::var("ANTHROPIC_API_KEY")
            .ok()
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty() && k != DEMO_KEY)?;

        let mut config = Self::new(api_key);
        if let Ok(base_url) = std::env::var("ANTHROPIC_BASE_URL") {
            config.base_url = base_url;
        }
        if let Ok(model) = std::env::var("ANTHROPIC_MODEL") {
            config.model = model;
        }
        if let Some(secs) = std::env::var("ANTHROPIC_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
        {
            config.timeout_secs = secs;
        }
        if let Some(tokens) = std::env::var("ANTHROPIC_MAX_TOKENS")
            .ok()
            .and_then(|s| s.parse().ok())
        {
            config.max_tokens = tokens;
        }
        Some(config)
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }
}

impl std::fmt::Debug for AnthropicConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnthropicConfig")
            .field("api_key", &"***")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("timeout_secs", &self.timeout_secs)
            .field("max_tokens", &self.max_tokens)
            .finish()
    }
}

#[derive(Serialize)]
struct WireMessage<'a> {
    role: &'static str,
    content: &'a [ContentBlock],
}

#[derive(Serialize)]
struct WireTool<'a> {
    name: &'a str,
    description: &'a str,
    input_schema: serde_json::Value,
}

#[derive(Serialize)]
struct WireRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: Vec<WireMessage<'a>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<WireTool<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<&'a str>,
}

#[derive(Deserialize)]
struct WireResponse {
    content: Vec<ContentBlock>,
    model: String,
    stop_reason: Option<String>,
    usage: Option<TokenUsage>,
}

/// Anthropic LLM provider
pub struct AnthropicProvider {
    client: reqwest::Client,
    config: AnthropicConfig,
}

impl AnthropicProvider {
    /// Create from configuration
    pub fn from_config(config: AnthropicConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AgentError::Config(format!("HTTP client: {e}")))?;

        Ok(Self { client, config })
    }

    /// Create from environment variables; `None` means demo mode
    pub fn from_env() -> Result<Option<Self>> {
        AnthropicConfig::from_env().map(Self::from_config).transpose()
    }

    /// Get configuration
    pub fn config(&self) -> &AnthropicConfig {
        &self.config
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.config.base_url.trim_end_matches('/'))
    }

    /// Convert agent messages to Messages API format
    fn convert_messages(messages: &[Message]) -> Vec<WireMessage<'_>> {
        messages
            .iter()
            .map(|m| WireMessage {
                role: match m.role {
                    Role::User | Role::Tool => "user", // Tool results travel as user turns
                    Role::Assistant => "assistant",
                },
                content: &m.content,
            })
            .collect()
    }

    fn convert_tools(tools: &[ToolSchema]) -> Vec<WireTool<'_>> {
        tools
            .iter()
            .map(|t| WireTool {
                name: &t.name,
                description: &t.description,
                input_schema: t.input_schema(),
            })
            .collect()
    }

    fn convert_stop_reason(reason: Option<&str>) -> Option<FinishReason> {
        match reason? {
            "end_turn" => Some(FinishReason::Stop),
            "max_tokens" => Some(FinishReason::Length),
            "tool_use" => Some(FinishReason::ToolUse),
            "stop_sequence" => Some(FinishReason::StopSequence),
            _ => None,
        }
    }

    /// Parse a Messages API body into a completion
    fn parse_completion(body: &str) -> Result<Completion> {
        let response: WireResponse = serde_json::from_str(body)
            .map_err(|e| AgentError::MalformedResponse(e.to_string()))?;

        if response
            .content
            .iter()
            .any(|b| matches!(b, ContentBlock::ToolResult { .. }))
        {
            return Err(AgentError::MalformedResponse(
                "assistant response contains a tool_result block".into(),
            ));
        }

        Ok(Completion {
            content: response.content,
            model: response.model,
            usage: response.usage,
            finish_reason: Self::convert_stop_reason(response.stop_reason.as_deref()),
        })
    }
}

#[async_trait]
impl LlmProvider for AnthropicProvider {
    async fn info(&self) -> Result<ProviderInfo> {
        let mut models: Vec<ModelInfo> = KNOWN_MODELS
            .iter()
            .map(|(id, name)| ModelInfo::new(*id, *name))
            .collect();
        if !models.iter().any(|m| m.id == self.config.model) {
            models.insert(0, ModelInfo::new(&self.config.model, &self.config.model));
        }

        Ok(ProviderInfo {
            name: "Anthropic".into(),
            models,
            supports_tools: true,
        })
    }

    async fn health_check(&self) -> Result<bool> {
        let response = self
            .client
            .get(self.url("/v1/models"))
            .header("x-api-key", &self.config.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .send()
            .await;

        match response {
            Ok(r) => Ok(r.status().is_success()),
            Err(e) => {
                tracing::warn!(error = %e, "Anthropic health check failed");
                Ok(false)
            }
        }
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<Completion> {
        let body = WireRequest {
            model: &request.model,
            max_tokens: request.max_tokens,
            messages: Self::convert_messages(&request.messages),
            tools: Self::convert_tools(&request.tools),
            system: request.system.as_deref(),
        };

        tracing::debug!(
            model = %request.model,
            messages = request.messages.len(),
            tools = request.tools.len(),
            "Anthropic request"
        );

        let response = self
            .client
            .post(self.url("/v1/messages"))
            .header("x-api-key", &self.config.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&body)
            .send()
            .await
            .map_err(|e| AgentError::UpstreamUnavailable(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| AgentError::UpstreamUnavailable(e.to_string()))?;

        if !status.is_success() {
            tracing::error!(status = %status, body = %text, "Anthropic API error");
            return Err(AgentError::UpstreamUnavailable(format!(
                "status {}: {text}",
                status.as_u16()
            )));
        }

        let completion = Self::parse_completion(&text)?;
        tracing::debug!(
            blocks = completion.content.len(),
            finish_reason = ?completion.finish_reason,
            "Anthropic response"
        );
        Ok(completion)
    }
}
