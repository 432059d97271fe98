//! weather-agent HTTP Server
//!
//! Axum-based server exposing tool-augmented chat with weather lookup.
//!
//! Without an `ANTHROPIC_API_KEY` (or with the value `demo`) the server runs
//! fully offline: canned chat replies and fabricated weather.

mod handlers;
mod state;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use agent_core::{provider::GenerationOptions, DemoResponder, LlmProvider, OrchestratorBuilder};
use agent_credentials::{KeyConfig, KeyPolicy};
use agent_runtime::AnthropicProvider;
use weather_advisor::{
    tools::WeatherTool, DemoWeatherLookup, OpenMeteoLookup, WeatherLookup,
    WEATHER_ASSISTANT_PROMPT,
};

use crate::handlers::{
    chat_completions, chat_stream, get_weather, health_check, key_status, list_models,
    mcp_call_tool, mcp_initialize, mcp_list_tools,
};
use crate::state::AppState;

/// Build the application router
pub fn router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health
        .route("/health", get(health_check))
        // Chat API
        .route("/api/chat/completions", post(chat_completions))
        .route("/api/chat/stream", post(chat_stream))
        .route("/api/chat/models", get(list_models))
        // Weather & credentials
        .route("/api/weather/{city}", get(get_weather))
        .route("/api/keys/status", get(key_status))
        // MCP tool surface
        .route("/api/mcp/initialize", post(mcp_initialize))
        .route("/api/mcp/tools", get(mcp_list_tools))
        .route("/api/mcp/tools/call", post(mcp_call_tool))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn demo_seed() -> Option<u64> {
    std::env::var("DEMO_SEED").ok().and_then(|s| s.parse().ok())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load environment
    dotenvy::dotenv().ok();

    // Credential policy
    let key_config = KeyConfig::from_env().inspect_err(|e| {
        tracing::error!(error = %e, "{}", e.user_message());
    })?;
    let policy = Arc::new(KeyPolicy::from_config(&key_config));
    tracing::info!(rules = policy.rules().len(), "✓ Weather credential policy loaded");

    // Model backend; no key means demo mode
    let provider = AnthropicProvider::from_env()?;
    let seed = demo_seed();

    let lookup: Arc<dyn WeatherLookup> = if provider.is_some() {
        Arc::new(OpenMeteoLookup::from_env()?)
    } else {
        Arc::new(seed.map_or_else(DemoWeatherLookup::from_entropy, DemoWeatherLookup::seeded))
    };
    let weather = Arc::new(WeatherTool::new(lookup, policy));

    let mut builder = OrchestratorBuilder::new()
        .tool_arc(weather.clone())
        .tools_prompt(WEATHER_ASSISTANT_PROMPT);

    builder = match provider {
        Some(provider) => {
            let config = provider.config();
            let generation = GenerationOptions {
                model: config.model.clone(),
                max_tokens: config.max_tokens,
            };
            tracing::info!(model = %generation.model, "Using Anthropic backend");

            let provider: Arc<dyn LlmProvider> = Arc::new(provider);
            match provider.health_check().await {
                Ok(true) => tracing::info!("✓ Connected to Anthropic"),
                Ok(false) | Err(_) => {
                    tracing::warn!("⚠ Anthropic not reachable - chat requests will report errors");
                }
            }
            builder.generation(generation).provider(provider)
        }
        None => {
            tracing::warn!("⚠ ANTHROPIC_API_KEY not set - running in demo mode");
            tracing::warn!("  Replies are canned and weather is fabricated");
            builder.demo(seed.map_or_else(DemoResponder::from_entropy, DemoResponder::seeded))
        }
    };

    let orchestrator = Arc::new(builder.build()?);

    tracing::info!("Registered {} tools:", orchestrator.tools().len());
    for name in orchestrator.tools().names() {
        tracing::info!("  • {}", name);
    }

    let app = router(AppState::new(orchestrator, weather));

    // Start server
    let addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("══════════════════════════════════════════════════");
    tracing::info!("🚀 weather-agent server running on http://{}", addr);
    tracing::info!("══════════════════════════════════════════════════");
    tracing::info!("");
    tracing::info!("Endpoints:");
    tracing::info!("  GET  /health               - Health check");
    tracing::info!("  POST /api/chat/completions - Send message");
    tracing::info!("  POST /api/chat/stream      - Server-sent events");
    tracing::info!("  GET  /api/chat/models      - List available models");
    tracing::info!("  GET  /api/weather/{{city}}   - Current weather");
    tracing::info!("  GET  /api/keys/status      - Credential tier");
    tracing::info!("  GET  /api/mcp/tools        - MCP tool listing");
    tracing::info!("  POST /api/mcp/tools/call   - MCP tool invocation");
    tracing::info!("");

    axum::serve(listener, app).await?;

    Ok(())
}
