//! Weather tool driven through the chat orchestrator
//!
//! A scripted model backend requests `get_weather`; the real `WeatherTool`
//! resolves the caller's credential and calls an in-memory lookup.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use agent_core::provider::{FinishReason, ModelInfo, ProviderInfo};
use agent_core::{
    AgentError, CallerContext, ChatRequest, Completion, CompletionRequest, ContentBlock,
    LlmProvider, OrchestratorBuilder, ReplyKind,
};
use agent_credentials::{ApiKey, KeyPolicy, KeyRule};
use async_trait::async_trait;
use serde_json::json;
use weather_advisor::tools::WeatherTool;
use weather_advisor::{TemperatureUnit, WeatherLookup, WeatherSnapshot, WEATHER_ASSISTANT_PROMPT};

#[derive(Default)]
struct ScriptedProvider {
    script: Mutex<VecDeque<agent_core::Result<Completion>>>,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl ScriptedProvider {
    fn new(script: Vec<agent_core::Result<Completion>>) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(script.into()),
            requests: Mutex::default(),
        })
    }
}

#[async_trait]
impl LlmProvider for ScriptedProvider {
    async fn info(&self) -> agent_core::Result<ProviderInfo> {
        Ok(ProviderInfo {
            name: "scripted".into(),
            models: vec![ModelInfo::new("m", "Scripted")],
            supports_tools: true,
        })
    }

    async fn health_check(&self) -> agent_core::Result<bool> {
        Ok(true)
    }

    async fn complete(&self, request: &CompletionRequest) -> agent_core::Result<Completion> {
        self.requests.lock().unwrap().push(request.clone());
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(AgentError::UpstreamUnavailable("script exhausted".into())))
    }
}

/// Lookup that records the key it was handed and answers from a fixed table
#[derive(Default)]
struct TableLookup {
    tokyo: Option<WeatherSnapshot>,
    keys: Mutex<Vec<String>>,
}

#[async_trait]
impl WeatherLookup for TableLookup {
    async fn lookup(
        &self,
        city: &str,
        key: &ApiKey,
    ) -> weather_advisor::Result<Option<WeatherSnapshot>> {
        self.keys.lock().unwrap().push(key.expose().to_string());
        Ok(self.tokyo.clone().filter(|_| city == "Tokyo"))
    }

    fn name(&self) -> &str {
        "table"
    }
}

fn tokyo() -> WeatherSnapshot {
    WeatherSnapshot {
        city: "Tokyo".into(),
        country: "Japan".into(),
        temperature: 22.0,
        unit: TemperatureUnit::Celsius,
        description: "Clear sky".into(),
        humidity: 48,
        pressure: 1009.4,
        wind_speed: 3.2,
        cloud_cover: 5,
    }
}

fn weather_request(id: &str, city: &str) -> Completion {
    Completion {
        content: vec![
            ContentBlock::text("Let me look that up."),
            ContentBlock::ToolUse {
                id: id.into(),
                name: "get_weather".into(),
                input: json!({"city": city}),
            },
        ],
        model: "m".into(),
        usage: None,
        finish_reason: Some(FinishReason::ToolUse),
    }
}

fn policy() -> Arc<KeyPolicy> {
    Arc::new(
        KeyPolicy::new(ApiKey::default())
            .with_rule(KeyRule::premium(["u-gold"], Some(ApiKey::new("gold-key")))),
    )
}

#[tokio::test]
async fn test_absent_weather_with_failed_follow_up_reports_not_available() {
    let provider = ScriptedProvider::new(vec![
        Ok(weather_request("toolu_1", "Atlantis")),
        Err(AgentError::UpstreamUnavailable("status 529: overloaded".into())),
    ]);
    let lookup = Arc::new(TableLookup::default());
    let orchestrator = OrchestratorBuilder::new()
        .provider(provider.clone())
        .tool(WeatherTool::new(lookup.clone(), policy()))
        .tools_prompt(WEATHER_ASSISTANT_PROMPT)
        .build()
        .unwrap();

    let reply = orchestrator
        .respond_detailed(
            &ChatRequest::new("Weather in Atlantis?").with_tools(),
            &CallerContext::new("u-1"),
        )
        .await;

    assert_eq!(reply.kind, ReplyKind::ToolFallback);
    assert_eq!(reply.text, "Weather data not available");
    assert_eq!(lookup.keys.lock().unwrap().len(), 1);

    let requests = provider.requests.lock().unwrap();
    assert_eq!(requests.len(), 2);
    assert!(matches!(
        &requests[1].messages[2].content[0],
        ContentBlock::ToolResult { tool_use_id, is_error: false, content }
            if tool_use_id == "toolu_1" && content == "Weather data not available"
    ));
}

#[tokio::test]
async fn test_premium_caller_lookup_feeds_follow_up() {
    let provider = ScriptedProvider::new(vec![
        Ok(weather_request("toolu_7", "Tokyo")),
        Ok(Completion::from_text("Tokyo is 22°C with clear skies.", "m")),
    ]);
    let lookup = Arc::new(TableLookup {
        tokyo: Some(tokyo()),
        keys: Mutex::default(),
    });
    let orchestrator = OrchestratorBuilder::new()
        .provider(provider.clone())
        .tool(WeatherTool::new(lookup.clone(), policy()))
        .build()
        .unwrap();

    let reply = orchestrator
        .respond_detailed(
            &ChatRequest::new("Weather in Tokyo?").with_tools(),
            &CallerContext::new("u-gold").with_name("Grace"),
        )
        .await;

    assert_eq!(reply.kind, ReplyKind::ToolAssisted);
    assert_eq!(reply.text, "Tokyo is 22°C with clear skies.");
    assert_eq!(*lookup.keys.lock().unwrap(), vec!["gold-key"]);

    let requests = provider.requests.lock().unwrap();
    let ContentBlock::ToolResult { content, .. } = &requests[1].messages[2].content[0] else {
        panic!("follow-up is missing the tool result");
    };
    assert!(content.contains("Tokyo"));
    assert!(content.contains("22"));
}
