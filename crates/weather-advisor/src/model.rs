//! Domain Models for Weather Advisor

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Countries reporting in Fahrenheit (compared case-insensitively)
const FAHRENHEIT_COUNTRIES: &[&str] = &[
    "United States",
    "US",
    "USA",
    "United States of America",
    "Liberia",
    "Myanmar",
    "Burma",
    // US territories
    "Puerto Rico",
    "Guam",
    "American Samoa",
    "US Virgin Islands",
];

/// Temperature unit, derived from the resolved country
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TemperatureUnit {
    #[default]
    #[serde(rename = "°C")]
    Celsius,
    #[serde(rename = "°F")]
    Fahrenheit,
}

impl TemperatureUnit {
    /// Fahrenheit for the handful of countries that use it, Celsius elsewhere
    pub fn for_country(country: Option<&str>) -> Self {
        match country {
            Some(c) if FAHRENHEIT_COUNTRIES.iter().any(|f| f.eq_ignore_ascii_case(c.trim())) => {
                TemperatureUnit::Fahrenheit
            }
            _ => TemperatureUnit::Celsius,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            TemperatureUnit::Celsius => "°C",
            TemperatureUnit::Fahrenheit => "°F",
        }
    }

    /// Value of Open-Meteo's `temperature_unit` query parameter
    pub fn query_param(&self) -> &'static str {
        match self {
            TemperatureUnit::Celsius => "celsius",
            TemperatureUnit::Fahrenheit => "fahrenheit",
        }
    }
}

impl std::fmt::Display for TemperatureUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// Condition text from cloud cover percentage
pub fn describe_cloud_cover(cloud_cover: f64) -> &'static str {
    match cloud_cover {
        c if c <= 10.0 => "Clear sky",
        c if c <= 25.0 => "Mostly clear",
        c if c <= 50.0 => "Partly cloudy",
        c if c <= 75.0 => "Mostly cloudy",
        _ => "Overcast",
    }
}

/// Normalized current weather for one city
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub city: String,
    pub country: String,
    pub temperature: f64,
    pub unit: TemperatureUnit,
    pub description: String,
    /// Relative humidity, percent
    pub humidity: u8,
    /// Surface pressure, hPa
    pub pressure: f64,
    /// Wind speed, m/s
    pub wind_speed: f64,
    /// Cloud cover, percent
    pub cloud_cover: u8,
}

impl WeatherSnapshot {
    /// One-line summary, e.g. `🌤️ Weather in Tokyo, Japan: 22°C, Clear sky`
    pub fn summary(&self) -> String {
        format!(
            "🌤️ Weather in {}, {}: {}{}, {}",
            self.city, self.country, self.temperature, self.unit, self.description
        )
    }

    /// Structured payload handed back to the model
    pub fn payload(&self) -> Value {
        json!({
            "city": self.city,
            "country": self.country,
            "temperature": self.temperature,
            "unit": self.unit,
            "description": self.description,
            "humidity": self.humidity,
            "pressure": self.pressure,
            "wind_speed": self.wind_speed,
            "cloud_cover": self.cloud_cover,
        })
    }
}
