//! Service Kit - Agent Tools
//!
//! Domain-specific tools that implement `agent_core::Tool` for the weather advisor.

mod weather_lookup;

pub use weather_lookup::WeatherTool;
