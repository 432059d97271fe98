//! # weather-advisor
//!
//! Weather capability for the chat orchestrator: a geocode-then-forecast
//! lookup and the `get_weather` tool that wraps it.
//!
//! ```text
//! get_weather { city } ──► KeyPolicy::resolve(caller) ──► WeatherLookup
//!                                                           │
//!                        ToolOutput (summary + payload) ◄───┘
//! ```

pub mod error;
pub mod lookup;
pub mod model;
pub mod svckit;

pub use error::{Result, WeatherError};
pub use lookup::{DemoWeatherLookup, OpenMeteoConfig, OpenMeteoLookup, WeatherLookup};
pub use model::{TemperatureUnit, WeatherSnapshot, describe_cloud_cover};

/// Re-export tools for easy registration
pub mod tools {
    pub use crate::svckit::WeatherTool;
}

/// System prompt for tool-enabled chat. `{caller}` is replaced with the caller label.
pub const WEATHER_ASSISTANT_PROMPT: &str = "You are a helpful assistant. You can get weather \
information for cities using the get_weather tool. Always use the tool when asked about weather. \
You are talking to {caller}. When providing weather information, always address the user by name \
and include the temperature in the appropriate unit (Celsius for most countries, Fahrenheit for \
the US). Be conversational and friendly.";
