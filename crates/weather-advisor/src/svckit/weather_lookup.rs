//! Weather Lookup Tool
//!
//! Resolves the caller's credential, then asks the configured lookup for
//! current conditions. Unknown cities are a normal outcome, not an error.

use std::sync::Arc;

use agent_core::{
    AgentError, CallerContext, ParameterSchema, Result as CoreResult, Tool, ToolCall,
    ToolOutput, ToolSchema,
};
use agent_credentials::KeyPolicy;
use async_trait::async_trait;

use crate::error::Result;
use crate::lookup::WeatherLookup;
use crate::model::WeatherSnapshot;

/// Summary used when no weather is available for a city
pub const NOT_AVAILABLE: &str = "Weather data not available";

/// Tool for looking up current weather
pub struct WeatherTool {
    lookup: Arc<dyn WeatherLookup>,
    policy: Arc<KeyPolicy>,
}

impl WeatherTool {
    pub fn new(lookup: Arc<dyn WeatherLookup>, policy: Arc<KeyPolicy>) -> Self {
        Self { lookup, policy }
    }

    /// Current weather for `city` using the credential `caller_id` resolves to
    pub async fn current(&self, city: &str, caller_id: &str) -> Result<Option<WeatherSnapshot>> {
        let decision = self.policy.resolve(caller_id);
        tracing::debug!(
            caller = caller_id,
            source = decision.source.as_str(),
            lookup = self.lookup.name(),
            "Weather credential resolved"
        );
        self.lookup.lookup(city, &decision.key).await
    }

    /// Credential policy in use
    pub fn policy(&self) -> &KeyPolicy {
        &self.policy
    }
}

#[async_trait]
impl Tool for WeatherTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "get_weather".into(),
            description: "Get current weather information for a specific city".into(),
            parameters: vec![ParameterSchema::required(
                "city",
                "string",
                "The name of the city to get weather for",
            )],
        }
    }

    async fn execute(&self, call: &ToolCall, caller: &CallerContext) -> CoreResult<ToolOutput> {
        let city = call
            .arg_str("city")
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .ok_or_else(|| AgentError::MissingParameter("City parameter is required".into()))?;

        tracing::info!(city, caller = %caller.id, "Calling weather lookup");

        match self.current(city, &caller.id).await {
            Ok(Some(snapshot)) => Ok(ToolOutput::new(snapshot.summary(), snapshot.payload())),
            Ok(None) => Ok(ToolOutput::text(NOT_AVAILABLE)),
            Err(e) => Err(AgentError::ToolExecution(format!(
                "Failed to get weather data: {e}"
            ))),
        }
    }
}
