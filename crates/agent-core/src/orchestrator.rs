//! Chat Orchestration
//!
//! One call of [`ChatOrchestrator::respond`] runs at most two backend
//! exchanges:
//!
//! ```text
//! user ──► initial exchange ──► text?  ──────────────────────► answer
//!                      │
//!                      └─► tool_use blocks ──► ToolRegistry (in order)
//!                                                   │
//!                       follow-up exchange ◄────────┘
//!                        │               │
//!                      text          error / empty
//!                        │               │
//!                     answer     joined tool summaries
//! ```
//!
//! Every path ends in text. Backend failures are rendered through
//! [`AgentError::user_message`] and logged; nothing is raised to the caller.

use std::sync::Arc;

use crate::caller::CallerContext;
use crate::demo::DemoResponder;
use crate::error::{AgentError, ErrorKind, Result};
use crate::message::{Conversation, Message};
use crate::provider::{
    Completion, CompletionRequest, GenerationOptions, LlmProvider, ModelInfo,
};
use crate::tool::{ToolCall, ToolRegistry, ToolResult};

/// Answer when the backend returned no text at all
pub const NO_RESPONSE: &str = "No response from the model";

const DEFAULT_TOOLS_PROMPT: &str = "You are a helpful AI assistant with access to tools. \
You are helping {caller}. Use the available tools when they help answer the question.";

/// Inbound chat request
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ChatRequest {
    pub message: String,
    pub system_prompt: Option<String>,
    pub use_tools: bool,
}

impl ChatRequest {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..Self::default()
        }
    }

    pub fn with_tools(mut self) -> Self {
        self.use_tools = true;
        self
    }

    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(prompt.into());
        self
    }
}

/// Which branch produced an answer
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReplyKind {
    /// Text from a single exchange
    Direct,
    /// Text from the follow-up exchange after tool execution
    ToolAssisted,
    /// Follow-up failed or was empty; answer is the joined tool summaries
    ToolFallback,
    /// Model asked for a tool that is not registered
    UnknownTool,
    /// Backend failure rendered as text
    Failed(ErrorKind),
    /// Offline demo answer
    Demo,
}

/// Final answer plus how it was reached
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChatReply {
    pub text: String,
    pub kind: ReplyKind,
}

impl ChatReply {
    fn new(text: impl Into<String>, kind: ReplyKind) -> Self {
        Self {
            text: text.into(),
            kind,
        }
    }

    fn failed(error: &AgentError) -> Self {
        Self::new(error.user_message(), ReplyKind::Failed(error.kind()))
    }
}

/// Orchestrator configuration
#[derive(Clone, Debug)]
pub struct OrchestratorConfig {
    /// Model and token limit for every exchange
    pub generation: GenerationOptions,

    /// System prompt used with tools when the request carries none.
    /// `{caller}` is replaced with the caller label.
    pub tools_prompt: String,

    /// Tool the demo weather path runs
    pub demo_tool: String,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            generation: GenerationOptions::default(),
            tools_prompt: DEFAULT_TOOLS_PROMPT.into(),
            demo_tool: "get_weather".into(),
        }
    }
}

enum Backend {
    Live(Arc<dyn LlmProvider>),
    Demo(DemoResponder),
}

/// Tool-augmented chat orchestrator
pub struct ChatOrchestrator {
    backend: Backend,
    tools: Arc<ToolRegistry>,
    config: OrchestratorConfig,
}

impl ChatOrchestrator {
    /// Orchestrator backed by a real model provider
    pub fn live(
        provider: Arc<dyn LlmProvider>,
        tools: Arc<ToolRegistry>,
        config: OrchestratorConfig,
    ) -> Self {
        Self {
            backend: Backend::Live(provider),
            tools,
            config,
        }
    }

    /// Offline orchestrator; never touches the network
    pub fn demo(responder: DemoResponder, tools: Arc<ToolRegistry>, config: OrchestratorConfig) -> Self {
        Self {
            backend: Backend::Demo(responder),
            tools,
            config,
        }
    }

    pub fn is_demo(&self) -> bool {
        matches!(self.backend, Backend::Demo(_))
    }

    /// Get the tool registry
    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    /// Get configuration
    pub fn config(&self) -> &OrchestratorConfig {
        &self.config
    }

    /// Answer `request` on behalf of `caller`
    pub async fn respond(&self, request: &ChatRequest, caller: &CallerContext) -> String {
        self.respond_detailed(request, caller).await.text
    }

    /// Like [`respond`](Self::respond), also reporting which branch answered
    pub async fn respond_detailed(&self, request: &ChatRequest, caller: &CallerContext) -> ChatReply {
        tracing::info!(
            caller = %caller.id,
            use_tools = request.use_tools,
            demo = self.is_demo(),
            "Chat request"
        );

        let reply = match &self.backend {
            Backend::Demo(responder) => self.respond_demo(responder, request, caller).await,
            Backend::Live(provider) if request.use_tools => {
                self.respond_with_tools(provider.as_ref(), request, caller).await
            }
            Backend::Live(provider) => self.respond_plain(provider.as_ref(), request).await,
        };

        tracing::debug!(caller = %caller.id, kind = ?reply.kind, "Chat reply ready");
        reply
    }

    /// Models the backend offers
    pub async fn models(&self) -> Result<Vec<ModelInfo>> {
        match &self.backend {
            Backend::Live(provider) => Ok(provider.info().await?.models),
            Backend::Demo(_) => Ok(vec![ModelInfo::new("demo", "Demo responder")]),
        }
    }

    /// Backend reachability; always healthy in demo mode
    pub async fn health_check(&self) -> Result<bool> {
        match &self.backend {
            Backend::Live(provider) => provider.health_check().await,
            Backend::Demo(_) => Ok(true),
        }
    }

    async fn respond_plain(&self, provider: &dyn LlmProvider, request: &ChatRequest) -> ChatReply {
        let exchange = CompletionRequest::new(
            &self.config.generation,
            vec![Message::user(request.message.clone())],
        )
        .with_system(request.system_prompt.clone());

        match provider.complete(&exchange).await {
            Ok(completion) => ChatReply::new(first_text_or_default(&completion), ReplyKind::Direct),
            Err(e) => {
                tracing::error!(error = %e, "Model exchange failed");
                ChatReply::failed(&e)
            }
        }
    }

    async fn respond_with_tools(
        &self,
        provider: &dyn LlmProvider,
        request: &ChatRequest,
        caller: &CallerContext,
    ) -> ChatReply {
        let system = request
            .system_prompt
            .clone()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| self.config.tools_prompt.replace("{caller}", &caller.label()));
        let schemas = self.tools.schemas();

        let mut conversation = Conversation::from_user(request.message.clone());

        let initial = CompletionRequest::new(&self.config.generation, conversation.messages().to_vec())
            .with_tools(schemas.clone())
            .with_system(Some(system.clone()));

        let completion = match provider.complete(&initial).await {
            Ok(completion) => completion,
            Err(e) => {
                tracing::error!(error = %e, "Model exchange failed");
                return ChatReply::failed(&e);
            }
        };

        let calls = completion.tool_calls();
        if calls.is_empty() {
            return ChatReply::new(first_text_or_default(&completion), ReplyKind::Direct);
        }

        if let Some(unknown) = calls.iter().find(|c| self.tools.get(&c.name).is_none()) {
            tracing::warn!(tool = %unknown.name, "Model requested an unknown tool");
            return ChatReply::new(format!("Unknown tool: {}", unknown.name), ReplyKind::UnknownTool);
        }

        let mut results = Vec::with_capacity(calls.len());
        for call in &calls {
            let result = self.tools.execute(call, caller).await;
            if let Some(kind) = result.error_kind() {
                tracing::info!(tool = %call.name, id = %call.id, %kind, "Tool returned an error result");
            }
            results.push(result);
        }

        conversation.push(Message::assistant(completion.content));
        if let Err(e) = conversation.push_tool_results(&results) {
            tracing::warn!(error = %e, "Tool results rejected; skipping follow-up");
            return fallback(&results);
        }

        let follow_up = CompletionRequest::new(&self.config.generation, conversation.messages().to_vec())
            .with_tools(schemas)
            .with_system(Some(system));

        match provider.complete(&follow_up).await {
            Ok(completion) => match completion.first_text().filter(|t| !t.trim().is_empty()) {
                Some(text) => ChatReply::new(text, ReplyKind::ToolAssisted),
                None => {
                    tracing::warn!("Follow-up exchange returned no text; using tool summaries");
                    fallback(&results)
                }
            },
            Err(e) => {
                tracing::warn!(error = %e, "Follow-up exchange failed; using tool summaries");
                fallback(&results)
            }
        }
    }

    async fn respond_demo(
        &self,
        responder: &DemoResponder,
        request: &ChatRequest,
        caller: &CallerContext,
    ) -> ChatReply {
        if !(request.use_tools && DemoResponder::mentions_weather(&request.message)) {
            return ChatReply::new(responder.canned_reply(&request.message), ReplyKind::Demo);
        }

        let city = responder.pick_city();
        let call = ToolCall::new(
            format!("demo_{}", uuid::Uuid::new_v4().simple()),
            self.config.demo_tool.clone(),
            serde_json::json!({ "city": city }),
        );

        let result = self.tools.execute(&call, caller).await;
        ChatReply::new(DemoResponder::weather_reply(city, result.summary()), ReplyKind::Demo)
    }
}

fn first_text_or_default(completion: &Completion) -> String {
    completion.first_text().unwrap_or(NO_RESPONSE).to_string()
}

fn fallback(results: &[ToolResult]) -> ChatReply {
    let text = results
        .iter()
        .map(ToolResult::summary)
        .collect::<Vec<_>>()
        .join("\n");
    ChatReply::new(text, ReplyKind::ToolFallback)
}

/// Builder for [`ChatOrchestrator`]
pub struct OrchestratorBuilder {
    provider: Option<Arc<dyn LlmProvider>>,
    demo: Option<DemoResponder>,
    tools: ToolRegistry,
    config: OrchestratorConfig,
}

impl Default for OrchestratorBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl OrchestratorBuilder {
    pub fn new() -> Self {
        Self {
            provider: None,
            demo: None,
            tools: ToolRegistry::new(),
            config: OrchestratorConfig::default(),
        }
    }

    pub fn provider(mut self, provider: Arc<dyn LlmProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Use the offline responder instead of a provider
    pub fn demo(mut self, responder: DemoResponder) -> Self {
        self.demo = Some(responder);
        self
    }

    pub fn tool<T: crate::tool::Tool + 'static>(mut self, tool: T) -> Self {
        self.tools.register(tool);
        self
    }

    pub fn tool_arc(mut self, tool: Arc<dyn crate::tool::Tool>) -> Self {
        self.tools.register_arc(tool);
        self
    }

    pub fn tools_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.config.tools_prompt = prompt.into();
        self
    }

    pub fn generation(mut self, generation: GenerationOptions) -> Self {
        self.config.generation = generation;
        self
    }

    pub fn build(self) -> Result<ChatOrchestrator> {
        let tools = Arc::new(self.tools);
        match (self.provider, self.demo) {
            (Some(provider), None) => Ok(ChatOrchestrator::live(provider, tools, self.config)),
            (None, Some(responder)) => Ok(ChatOrchestrator::demo(responder, tools, self.config)),
            (Some(_), Some(_)) => Err(AgentError::Config(
                "Provider and demo responder are mutually exclusive".into(),
            )),
            (None, None) => Err(AgentError::Config("Provider or demo responder is required".into())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use serde_json::json;

    use crate::message::{ContentBlock, Role};
    use crate::provider::{FinishReason, ProviderInfo};
    use crate::tool::{ParameterSchema, Tool, ToolOutput, ToolSchema};

    /// Replays queued completions and records every request
    #[derive(Default)]
    struct ScriptedProvider {
        script: Mutex<VecDeque<Result<Completion>>>,
        requests: Mutex<Vec<CompletionRequest>>,
    }

    impl ScriptedProvider {
        fn new(script: Vec<Result<Completion>>) -> Arc<Self> {
            Arc::new(Self {
                script: Mutex::new(script.into()),
                requests: Mutex::default(),
            })
        }

        fn requests(&self) -> Vec<CompletionRequest> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl LlmProvider for ScriptedProvider {
        async fn info(&self) -> Result<ProviderInfo> {
            Ok(ProviderInfo {
                name: "scripted".into(),
                models: vec![ModelInfo::new("m", "Scripted")],
                supports_tools: true,
            })
        }

        async fn health_check(&self) -> Result<bool> {
            Ok(true)
        }

        async fn complete(&self, request: &CompletionRequest) -> Result<Completion> {
            self.requests.lock().unwrap().push(request.clone());
            self.script
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(AgentError::UpstreamUnavailable("script exhausted".into())))
        }
    }

    /// Weather tool with a fixed Tokyo answer that counts invocations
    #[derive(Default)]
    struct CountingWeather {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl Tool for CountingWeather {
        fn schema(&self) -> ToolSchema {
            ToolSchema {
                name: "get_weather".into(),
                description: "Current weather for a city".into(),
                parameters: vec![ParameterSchema::required("city", "string", "City name")],
            }
        }

        async fn execute(&self, call: &ToolCall, _caller: &CallerContext) -> Result<ToolOutput> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let city = call.arg_str("city").unwrap_or_default();
            Ok(ToolOutput::new(
                format!("🌤️ Weather in {city}, Japan: 22°C, Clear sky"),
                json!({"city": city, "temperature": 22, "unit": "°C", "description": "Clear sky"}),
            ))
        }
    }

    fn tool_use(id: &str, name: &str, input: serde_json::Value) -> Completion {
        Completion {
            content: vec![
                ContentBlock::text("Let me check."),
                ContentBlock::ToolUse {
                    id: id.into(),
                    name: name.into(),
                    input,
                },
            ],
            model: "m".into(),
            usage: None,
            finish_reason: Some(FinishReason::ToolUse),
        }
    }

    fn orchestrator(provider: Arc<ScriptedProvider>, weather: Arc<CountingWeather>) -> ChatOrchestrator {
        OrchestratorBuilder::new()
            .provider(provider)
            .tool_arc(weather)
            .build()
            .unwrap()
    }

    fn caller() -> CallerContext {
        CallerContext::new("u-1").with_name("Ada")
    }

    #[tokio::test]
    async fn test_plain_chat_single_exchange() {
        let provider = ScriptedProvider::new(vec![
            Ok(tool_use("t1", "get_weather", json!({"city": "Tokyo"}))),
            Ok(Completion::from_text("unused", "m")),
        ]);
        let weather = Arc::new(CountingWeather::default());
        let orch = orchestrator(provider.clone(), weather.clone());

        let reply = orch
            .respond_detailed(&ChatRequest::new("Hello").with_system_prompt("Be brief"), &caller())
            .await;

        assert_eq!(reply.kind, ReplyKind::Direct);
        assert_eq!(reply.text, "Let me check.");
        assert_eq!(weather.calls.load(Ordering::SeqCst), 0);

        let requests = provider.requests();
        assert_eq!(requests.len(), 1);
        assert!(requests[0].tools.is_empty());
        assert_eq!(requests[0].system.as_deref(), Some("Be brief"));
    }

    #[tokio::test]
    async fn test_tokyo_round_trip() {
        let provider = ScriptedProvider::new(vec![
            Ok(tool_use("toolu_42", "get_weather", json!({"city": "Tokyo"}))),
            Ok(Completion::from_text("It's 22°C and clear in Tokyo right now.", "m")),
        ]);
        let weather = Arc::new(CountingWeather::default());
        let orch = orchestrator(provider.clone(), weather.clone());

        let reply = orch
            .respond_detailed(&ChatRequest::new("What's the weather in Tokyo?").with_tools(), &caller())
            .await;

        assert_eq!(reply.kind, ReplyKind::ToolAssisted);
        assert!(reply.text.contains("Tokyo"));
        assert!(reply.text.contains("22"));
        assert_eq!(weather.calls.load(Ordering::SeqCst), 1);

        let requests = provider.requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].tools.len(), 1);
        assert!(requests[0].system.as_deref().unwrap().contains("Ada (ID: u-1)"));

        let follow_up = &requests[1].messages;
        assert_eq!(follow_up.len(), 3);
        assert_eq!(follow_up[1].role, Role::Assistant);
        assert_eq!(follow_up[2].role, Role::Tool);
        assert!(matches!(
            &follow_up[2].content[0],
            ContentBlock::ToolResult { tool_use_id, is_error: false, .. } if tool_use_id == "toolu_42"
        ));
    }

    #[tokio::test]
    async fn test_each_tool_use_executed_once_in_order() {
        let mut first = tool_use("a", "get_weather", json!({"city": "Paris"}));
        first.content.push(ContentBlock::ToolUse {
            id: "b".into(),
            name: "get_weather".into(),
            input: json!({"city": "Oslo"}),
        });
        let provider = ScriptedProvider::new(vec![Ok(first), Ok(Completion::from_text("done", "m"))]);
        let weather = Arc::new(CountingWeather::default());
        let orch = orchestrator(provider.clone(), weather.clone());

        orch.respond(&ChatRequest::new("weather?").with_tools(), &caller()).await;

        assert_eq!(weather.calls.load(Ordering::SeqCst), 2);
        let requests = provider.requests();
        let ids: Vec<_> = requests[1].messages[2]
            .content
            .iter()
            .filter_map(|b| match b {
                ContentBlock::ToolResult { tool_use_id, .. } => Some(tool_use_id.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[tokio::test]
    async fn test_follow_up_failure_falls_back_to_summaries() {
        let provider = ScriptedProvider::new(vec![
            Ok(tool_use("t1", "get_weather", json!({"city": "Tokyo"}))),
            Err(AgentError::UpstreamUnavailable("status 529".into())),
        ]);
        let orch = orchestrator(provider.clone(), Arc::new(CountingWeather::default()));

        let reply = orch
            .respond_detailed(&ChatRequest::new("Tokyo weather").with_tools(), &caller())
            .await;

        assert_eq!(reply.kind, ReplyKind::ToolFallback);
        assert_eq!(reply.text, "🌤️ Weather in Tokyo, Japan: 22°C, Clear sky");
        assert_eq!(provider.requests().len(), 2);
    }

    #[tokio::test]
    async fn test_empty_follow_up_falls_back() {
        let empty = Completion {
            content: vec![],
            model: "m".into(),
            usage: None,
            finish_reason: Some(FinishReason::Stop),
        };
        let provider = ScriptedProvider::new(vec![
            Ok(tool_use("t1", "get_weather", json!({"city": "Tokyo"}))),
            Ok(empty),
        ]);
        let orch = orchestrator(provider, Arc::new(CountingWeather::default()));

        let reply = orch
            .respond_detailed(&ChatRequest::new("Tokyo weather").with_tools(), &caller())
            .await;

        assert_eq!(reply.kind, ReplyKind::ToolFallback);
        assert!(!reply.text.is_empty());
    }

    #[tokio::test]
    async fn test_missing_city_never_looks_up() {
        let provider = ScriptedProvider::new(vec![
            Ok(tool_use("t1", "get_weather", json!({}))),
            Ok(Completion::from_text("", "m")),
        ]);
        let weather = Arc::new(CountingWeather::default());
        let orch = orchestrator(provider.clone(), weather.clone());

        let reply = orch
            .respond_detailed(&ChatRequest::new("What's the weather?").with_tools(), &caller())
            .await;

        assert_eq!(weather.calls.load(Ordering::SeqCst), 0);
        assert_eq!(reply.text, "City parameter is required");

        let requests = provider.requests();
        assert!(matches!(
            &requests[1].messages[2].content[0],
            ContentBlock::ToolResult { is_error: true, .. }
        ));
    }

    #[tokio::test]
    async fn test_unknown_tool_short_circuits() {
        let provider = ScriptedProvider::new(vec![
            Ok(tool_use("t1", "get_stock_price", json!({"symbol": "ACME"}))),
            Ok(Completion::from_text("unused", "m")),
        ]);
        let weather = Arc::new(CountingWeather::default());
        let orch = orchestrator(provider.clone(), weather.clone());

        let reply = orch
            .respond_detailed(&ChatRequest::new("price?").with_tools(), &caller())
            .await;

        assert_eq!(reply.kind, ReplyKind::UnknownTool);
        assert_eq!(reply.text, "Unknown tool: get_stock_price");
        assert_eq!(provider.requests().len(), 1);
        assert_eq!(weather.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_backend_error_becomes_text() {
        let provider = ScriptedProvider::new(vec![Err(AgentError::UpstreamUnavailable(
            "status 401: invalid x-api-key".into(),
        ))]);
        let orch = orchestrator(provider, Arc::new(CountingWeather::default()));

        let reply = orch.respond_detailed(&ChatRequest::new("hi"), &caller()).await;

        assert_eq!(reply.kind, ReplyKind::Failed(ErrorKind::UpstreamUnavailable));
        assert!(reply.text.contains("401"));
    }

    #[tokio::test]
    async fn test_tools_enabled_without_tool_use_is_direct() {
        let provider = ScriptedProvider::new(vec![
            Ok(Completion::from_text("Hi Ada! Ask me about the weather anywhere.", "m")),
            Ok(Completion::from_text("unused", "m")),
        ]);
        let weather = Arc::new(CountingWeather::default());
        let orch = orchestrator(provider.clone(), weather.clone());

        let reply = orch
            .respond_detailed(&ChatRequest::new("Hello").with_tools(), &caller())
            .await;

        assert_eq!(reply.kind, ReplyKind::Direct);
        assert_eq!(reply.text, "Hi Ada! Ask me about the weather anywhere.");
        assert_eq!(weather.calls.load(Ordering::SeqCst), 0);

        let requests = provider.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].tools.len(), 1);
    }

    #[tokio::test]
    async fn test_malformed_backend_reply_becomes_text() {
        let provider = ScriptedProvider::new(vec![Err(AgentError::MalformedResponse(
            "unknown content block type `image`".into(),
        ))]);
        let orch = orchestrator(provider.clone(), Arc::new(CountingWeather::default()));

        let reply = orch
            .respond_detailed(&ChatRequest::new("weather?").with_tools(), &caller())
            .await;

        assert_eq!(reply.kind, ReplyKind::Failed(ErrorKind::MalformedResponse));
        assert!(!reply.text.is_empty());
        assert_eq!(provider.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_demo_reply_is_seeded() {
        let weather = Arc::new(CountingWeather::default());
        let orch = OrchestratorBuilder::new()
            .demo(DemoResponder::seeded(9))
            .tool_arc(weather.clone())
            .build()
            .unwrap();
        let twin = DemoResponder::seeded(9);

        for use_tools in [false, true] {
            let request = ChatRequest {
                message: "Tell me a joke".into(),
                system_prompt: None,
                use_tools,
            };
            let reply = orch.respond_detailed(&request, &caller()).await;
            assert_eq!(reply.kind, ReplyKind::Demo);
            assert_eq!(reply.text, twin.canned_reply("Tell me a joke"));
        }
        assert_eq!(weather.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_demo_weather_runs_tool_once() {
        let weather = Arc::new(CountingWeather::default());
        let orch = OrchestratorBuilder::new()
            .demo(DemoResponder::seeded(3))
            .tool_arc(weather.clone())
            .build()
            .unwrap();
        let city = DemoResponder::seeded(3).pick_city();

        let reply = orch
            .respond(&ChatRequest::new("How's the weather?").with_tools(), &caller())
            .await;

        assert_eq!(weather.calls.load(Ordering::SeqCst), 1);
        assert_eq!(
            reply,
            DemoResponder::weather_reply(city, &format!("🌤️ Weather in {city}, Japan: 22°C, Clear sky"))
        );
    }

    #[test]
    fn test_builder_requires_backend() {
        assert!(OrchestratorBuilder::new().build().is_err());
    }
}
