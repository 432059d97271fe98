//! Application State

use std::sync::Arc;
use std::time::Duration;

use agent_core::ChatOrchestrator;
use agent_core::stream::STREAM_CHUNK_DELAY;
use weather_advisor::tools::WeatherTool;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Chat orchestrator (live or demo backend)
    pub orchestrator: Arc<ChatOrchestrator>,

    /// Weather tool, also registered with the orchestrator
    pub weather: Arc<WeatherTool>,

    /// Pause between streamed words
    pub stream_delay: Duration,
}

impl AppState {
    pub fn new(orchestrator: Arc<ChatOrchestrator>, weather: Arc<WeatherTool>) -> Self {
        Self {
            orchestrator,
            weather,
            stream_delay: STREAM_CHUNK_DELAY,
        }
    }
}
