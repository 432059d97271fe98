//! HTTP Handlers

use std::convert::Infallible;

use axum::{
    body::Bytes,
    extract::{FromRequestParts, Path, State},
    http::{request::Parts, StatusCode},
    response::sse::{Event, Sse},
    Json,
};
use chrono::{DateTime, Utc};
use futures::stream::{self, BoxStream, StreamExt};
use serde::{Deserialize, Serialize};

use agent_core::{
    caller::UNKNOWN_CALLER, provider::ModelInfo, stream::pace_words, CallerContext, ChatRequest,
    ErrorKind, StreamFrame, ToolCall,
};
use agent_credentials::KeySource;
use weather_advisor::WeatherSnapshot;

use crate::state::AppState;

/// Header carrying the authenticated caller id
pub const USER_ID_HEADER: &str = "x-user-id";

/// Header carrying the authenticated caller display name
pub const USER_NAME_HEADER: &str = "x-user-name";

// ============================================================================
// Caller Identity
// ============================================================================

/// Caller identity as set by the authentication layer in front of this service
pub struct Caller(pub CallerContext);

impl<S: Send + Sync> FromRequestParts<S> for Caller {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header = |name: &str| {
            parts
                .headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };

        let mut caller = CallerContext::new(
            header(USER_ID_HEADER).unwrap_or_else(|| UNKNOWN_CALLER.to_string()),
        );
        caller.name = header(USER_NAME_HEADER);
        Ok(Self(caller))
    }
}

// ============================================================================
// Request / Response Types
// ============================================================================

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub mode: &'static str,
    pub backend_connected: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatBody {
    pub message: String,
    #[serde(default)]
    pub system_prompt: Option<String>,
    #[serde(default)]
    pub use_tools: bool,
}

impl ChatBody {
    fn into_request(self) -> ChatRequest {
        ChatRequest {
            message: self.message,
            system_prompt: self.system_prompt.filter(|s| !s.trim().is_empty()),
            use_tools: self.use_tools,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatResponse {
    pub message: String,
    pub user_id: String,
    pub user_name: String,
    pub timestamp: DateTime<Utc>,
    pub model: &'static str,
}

#[derive(Debug, Serialize)]
pub struct ModelsResponse {
    pub models: Vec<ModelInfo>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyStatusResponse {
    pub user_id: String,
    pub user_name: String,
    pub weather: WeatherKeyStatus,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherKeyStatus {
    pub source: KeySource,
    pub has_custom_key: bool,
    pub using_free_tier: bool,
    pub premium: bool,
    pub role: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn api_error(status: StatusCode, error: impl Into<String>, code: &str) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: error.into(),
            code: code.into(),
        }),
    )
}

// ============================================================================
// MCP Tool Surface
// ============================================================================

/// MCP protocol revision spoken by the tool surface
pub const MCP_PROTOCOL_VERSION: &str = "2024-11-05";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct McpInitializeResponse {
    pub protocol_version: &'static str,
    pub capabilities: McpCapabilities,
    pub server_info: McpServerInfo,
}

#[derive(Debug, Serialize)]
pub struct McpCapabilities {
    pub tools: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Serialize)]
pub struct McpServerInfo {
    pub name: &'static str,
    pub version: &'static str,
}

#[derive(Debug, Serialize)]
pub struct McpToolsResponse {
    pub tools: Vec<McpToolInfo>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct McpToolInfo {
    pub name: String,
    pub description: String,
    pub input_schema: serde_json::Value,
}

#[derive(Debug, Deserialize)]
pub struct McpCallBody {
    pub name: String,
    #[serde(default)]
    pub arguments: serde_json::Value,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct McpCallResponse {
    pub content: Vec<McpContent>,
    pub is_error: bool,
}

#[derive(Debug, Serialize)]
pub struct McpContent {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub text: String,
}

/// Pseudo-model advertised for tool-enabled chat
const TOOLS_MODEL_ID: &str = "chat-with-tools";

// ============================================================================
// Handlers
// ============================================================================

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let backend_connected = state.orchestrator.health_check().await.unwrap_or(false);

    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        mode: if state.orchestrator.is_demo() { "demo" } else { "live" },
        backend_connected,
    })
}

/// Main chat endpoint
pub async fn chat_completions(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Json(payload): Json<ChatBody>,
) -> Json<ChatResponse> {
    let mut request = payload.into_request();

    if !request.use_tools && request.system_prompt.is_none() {
        request.system_prompt = Some(format!(
            "You are a helpful assistant talking to {}. Always address them by name when \
             appropriate and be conversational and friendly.",
            caller.display_name()
        ));
    }

    let message = state.orchestrator.respond(&request, &caller).await;

    Json(ChatResponse {
        message,
        user_id: caller.id.clone(),
        user_name: caller.display_name().to_string(),
        timestamp: Utc::now(),
        model: if request.use_tools { TOOLS_MODEL_ID } else { "chat" },
    })
}

/// Server-sent events chat. The full answer is computed before the first word is sent.
pub async fn chat_stream(
    State(state): State<AppState>,
    Caller(caller): Caller,
    body: Bytes,
) -> Sse<BoxStream<'static, Result<Event, Infallible>>> {
    let frames: BoxStream<'static, StreamFrame> = match serde_json::from_slice::<ChatBody>(&body) {
        Ok(payload) => {
            let answer = state
                .orchestrator
                .respond(&payload.into_request(), &caller)
                .await;
            pace_words(answer, state.stream_delay).boxed()
        }
        Err(e) => {
            tracing::warn!(caller = %caller.id, error = %e, "Invalid stream request");
            stream::once(async move { StreamFrame::Error(e.to_string()) }).boxed()
        }
    };

    Sse::new(
        frames
            .map(|frame| Ok(Event::default().data(frame.data())))
            .boxed(),
    )
}

/// Models offered by the backend plus the tool-enabled pseudo-model
pub async fn list_models(
    State(state): State<AppState>,
) -> Result<Json<ModelsResponse>, ApiError> {
    let mut models = state.orchestrator.models().await.map_err(|e| {
        tracing::error!(error = %e, "Failed to list models");
        api_error(StatusCode::BAD_GATEWAY, e.user_message(), "BACKEND_ERROR")
    })?;

    models.push(ModelInfo::new(TOOLS_MODEL_ID, "Chat with weather tools"));
    Ok(Json(ModelsResponse { models }))
}

/// Direct weather lookup for the caller
pub async fn get_weather(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Path(city): Path<String>,
) -> Result<Json<WeatherSnapshot>, ApiError> {
    match state.weather.current(&city, &caller.id).await {
        Ok(Some(snapshot)) => Ok(Json(snapshot)),
        Ok(None) => Err(api_error(
            StatusCode::NOT_FOUND,
            format!("Weather data not available for {city}"),
            "NOT_FOUND",
        )),
        Err(e) => {
            tracing::error!(city = %city, error = %e, "Weather lookup failed");
            Err(api_error(
                StatusCode::BAD_GATEWAY,
                "Weather service unavailable",
                "WEATHER_ERROR",
            ))
        }
    }
}

/// Which credential tier the caller resolves to. Never returns the key.
pub async fn key_status(
    State(state): State<AppState>,
    Caller(caller): Caller,
) -> Json<KeyStatusResponse> {
    let policy = state.weather.policy();
    let decision = policy.resolve(&caller.id);
    let entitlements = policy.entitlements(&caller.id);

    Json(KeyStatusResponse {
        user_id: caller.id.clone(),
        user_name: caller.display_name().to_string(),
        weather: WeatherKeyStatus {
            source: decision.source,
            has_custom_key: decision.source == KeySource::UserOverride,
            using_free_tier: decision.key.is_free_tier(),
            premium: entitlements.premium,
            role: entitlements.role,
        },
    })
}

/// MCP handshake
pub async fn mcp_initialize() -> Json<McpInitializeResponse> {
    Json(McpInitializeResponse {
        protocol_version: MCP_PROTOCOL_VERSION,
        capabilities: McpCapabilities {
            tools: serde_json::Map::new(),
        },
        server_info: McpServerInfo {
            name: env!("CARGO_PKG_NAME"),
            version: env!("CARGO_PKG_VERSION"),
        },
    })
}

/// Registered tools with their input schemas
pub async fn mcp_list_tools(State(state): State<AppState>) -> Json<McpToolsResponse> {
    let tools = state
        .orchestrator
        .tools()
        .schemas()
        .into_iter()
        .map(|schema| McpToolInfo {
            input_schema: schema.input_schema(),
            name: schema.name,
            description: schema.description,
        })
        .collect();

    Json(McpToolsResponse { tools })
}

/// Run one tool for the caller through the same registry the chat flow uses
pub async fn mcp_call_tool(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Json(body): Json<McpCallBody>,
) -> Result<Json<McpCallResponse>, ApiError> {
    let call = ToolCall::new(
        format!("mcp_{}", Utc::now().timestamp_millis()),
        body.name,
        body.arguments,
    );
    let result = state.orchestrator.tools().execute(&call, &caller).await;

    match result.error_kind() {
        Some(ErrorKind::UnknownTool) => Err(api_error(
            StatusCode::BAD_REQUEST,
            result.summary(),
            "UNKNOWN_TOOL",
        )),
        Some(ErrorKind::MissingParameter) => Err(api_error(
            StatusCode::BAD_REQUEST,
            result.summary(),
            "INVALID_ARGUMENTS",
        )),
        kind => Ok(Json(McpCallResponse {
            content: vec![McpContent {
                kind: "text",
                text: result.summary().to_string(),
            }],
            is_error: kind.is_some(),
        })),
    }
}
