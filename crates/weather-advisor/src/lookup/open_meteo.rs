//! Open-Meteo Lookup
//!
//! Geocodes the city name, then fetches current conditions for the first
//! match. Any failure along the way is logged and reported as absence.

use std::time::Duration;

use agent_credentials::ApiKey;
use async_trait::async_trait;
use serde::Deserialize;

use super::WeatherLookup;
use crate::error::{Result, WeatherError};
use crate::model::{describe_cloud_cover, TemperatureUnit, WeatherSnapshot};

const CURRENT_FIELDS: &str =
    "temperature_2m,relative_humidity_2m,surface_pressure,wind_speed_10m,cloud_cover";

/// Open-Meteo endpoints and client settings
#[derive(Clone, Debug)]
pub struct OpenMeteoConfig {
    /// Geocoding search endpoint
    pub geocoding_url: String,

    /// Forecast endpoint
    pub forecast_url: String,

    /// Per-request timeout
    pub timeout: Duration,
}

impl Default for OpenMeteoConfig {
    fn default() -> Self {
        Self {
            geocoding_url: "https://geocoding-api.open-meteo.com/v1/search".into(),
            forecast_url: "https://api.open-meteo.com/v1/forecast".into(),
            timeout: Duration::from_millis(10_000),
        }
    }
}

impl OpenMeteoConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let geocoding_url =
            std::env::var("WEATHER_GEOCODING_URL").unwrap_or(defaults.geocoding_url);
        let forecast_url = std::env::var("WEATHER_FORECAST_URL").unwrap_or(defaults.forecast_url);
        let timeout = std::env::var("WEATHER_TIMEOUT_MS")
            .ok()
            .and_then(|ms| ms.parse().ok())
            .map_or(defaults.timeout, Duration::from_millis);

        Self {
            geocoding_url,
            forecast_url,
            timeout,
        }
    }

    /// Point both endpoints at one base URL (`{base}/v1/search`, `{base}/v1/forecast`)
    pub fn with_base_url(base: &str) -> Self {
        let base = base.trim_end_matches('/');
        Self {
            geocoding_url: format!("{base}/v1/search"),
            forecast_url: format!("{base}/v1/forecast"),
            ..Self::default()
        }
    }
}

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    #[serde(default)]
    results: Vec<Location>,
}

#[derive(Debug, Deserialize)]
struct Location {
    name: String,
    country: Option<String>,
    latitude: f64,
    longitude: f64,
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    current: Option<CurrentConditions>,
}

#[derive(Debug, Deserialize)]
struct CurrentConditions {
    temperature_2m: f64,
    relative_humidity_2m: f64,
    surface_pressure: f64,
    wind_speed_10m: f64,
    cloud_cover: f64,
}

/// Open-Meteo weather client
pub struct OpenMeteoLookup {
    client: reqwest::Client,
    config: OpenMeteoConfig,
}

impl OpenMeteoLookup {
    pub fn new(config: OpenMeteoConfig) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }

    /// Create from environment variables
    pub fn from_env() -> Result<Self> {
        Self::new(OpenMeteoConfig::from_env())
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        let response = self.client.get(url).query(query).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(WeatherError::Upstream {
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    async fn fetch(&self, city: &str, key: &ApiKey) -> Result<Option<WeatherSnapshot>> {
        let mut auth = Vec::new();
        if !key.is_free_tier() && !key.is_empty() {
            auth.push(("apikey", key.expose().to_string()));
        }

        let mut query = vec![
            ("name", city.to_string()),
            ("count", "1".to_string()),
            ("language", "en".to_string()),
            ("format", "json".to_string()),
        ];
        query.extend(auth.iter().cloned());

        tracing::info!(city, "Geocoding request");
        let geocode: GeocodeResponse = self.get_json(&self.config.geocoding_url, &query).await?;

        let Some(location) = geocode.results.into_iter().next() else {
            tracing::warn!(city, "City not found");
            return Ok(None);
        };

        let unit = TemperatureUnit::for_country(location.country.as_deref());
        tracing::debug!(
            name = %location.name,
            country = ?location.country,
            lat = location.latitude,
            lon = location.longitude,
            %unit,
            "Location resolved"
        );

        let mut query = vec![
            ("latitude", location.latitude.to_string()),
            ("longitude", location.longitude.to_string()),
            ("current", CURRENT_FIELDS.to_string()),
            ("temperature_unit", unit.query_param().to_string()),
            ("wind_speed_unit", "ms".to_string()),
            ("timezone", "auto".to_string()),
        ];
        query.extend(auth);

        let forecast: ForecastResponse = self.get_json(&self.config.forecast_url, &query).await?;

        let Some(current) = forecast.current else {
            tracing::warn!(city, "No current conditions in forecast response");
            return Ok(None);
        };

        let snapshot = WeatherSnapshot {
            city: location.name,
            country: location.country.unwrap_or_default(),
            temperature: current.temperature_2m,
            unit,
            description: describe_cloud_cover(current.cloud_cover).to_string(),
            humidity: percent(current.relative_humidity_2m),
            pressure: current.surface_pressure,
            wind_speed: current.wind_speed_10m,
            cloud_cover: percent(current.cloud_cover),
        };

        tracing::info!(
            city = %snapshot.city,
            temperature = snapshot.temperature,
            unit = %snapshot.unit,
            description = %snapshot.description,
            "Weather retrieved"
        );
        Ok(Some(snapshot))
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn percent(value: f64) -> u8 {
    value.clamp(0.0, 100.0) as u8
}

#[async_trait]
impl WeatherLookup for OpenMeteoLookup {
    async fn lookup(&self, city: &str, key: &ApiKey) -> Result<Option<WeatherSnapshot>> {
        match self.fetch(city, key).await {
            Ok(snapshot) => Ok(snapshot),
            Err(e) => {
                tracing::error!(city, error = %e, "Failed to get weather");
                Ok(None)
            }
        }
    }

    fn name(&self) -> &str {
        "Open-Meteo"
    }
}
