//! Weather Lookup
//!
//! Leaf clients resolving a city name to a [`WeatherSnapshot`].

mod demo;
mod open_meteo;

pub use demo::DemoWeatherLookup;
pub use open_meteo::{OpenMeteoConfig, OpenMeteoLookup};

use agent_credentials::ApiKey;
use async_trait::async_trait;

use crate::error::Result;
use crate::model::WeatherSnapshot;

/// Weather lookup trait (Strategy pattern)
///
/// `Ok(None)` means no weather is available for the city. Implementations
/// should prefer absence over errors for anything the caller cannot fix.
#[async_trait]
pub trait WeatherLookup: Send + Sync {
    /// Current weather for `city`, authenticated with `key`
    async fn lookup(&self, city: &str, key: &ApiKey) -> Result<Option<WeatherSnapshot>>;

    /// Lookup name
    fn name(&self) -> &str;
}
