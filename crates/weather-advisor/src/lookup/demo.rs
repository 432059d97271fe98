//! Demo Weather Lookup
//!
//! Offline lookup that fabricates plausible conditions. Never touches the
//! network; seed it for repeatable output.

use std::sync::{Mutex, PoisonError};

use agent_credentials::ApiKey;
use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use super::WeatherLookup;
use crate::error::Result;
use crate::model::{TemperatureUnit, WeatherSnapshot};

const TEMPERATURES: [i32; 9] = [18, 22, 25, 28, 15, 12, 30, 8, 35];
const DESCRIPTIONS: [&str; 6] = [
    "Clear sky",
    "Partly cloudy",
    "Overcast",
    "Light rain",
    "Sunny",
    "Cloudy",
];
const US_CITIES: [&str; 6] = ["new york", "los angeles", "chicago", "miami", "boston", "seattle"];

/// Fabricated weather for demo mode
pub struct DemoWeatherLookup {
    rng: Mutex<StdRng>,
}

impl DemoWeatherLookup {
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    pub fn from_entropy() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    fn is_us_city(city: &str) -> bool {
        let city = city.to_lowercase();
        US_CITIES.iter().any(|us| city.contains(us))
    }

    fn generate(&self, city: &str) -> WeatherSnapshot {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        let us = Self::is_us_city(city);

        let celsius = TEMPERATURES.choose(&mut *rng).copied().unwrap_or(20);
        let (temperature, unit) = if us {
            (celsius * 9 / 5 + 32, TemperatureUnit::Fahrenheit)
        } else {
            (celsius, TemperatureUnit::Celsius)
        };

        WeatherSnapshot {
            city: city.to_string(),
            country: if us { "United States" } else { "Demo" }.to_string(),
            temperature: f64::from(temperature),
            unit,
            description: DESCRIPTIONS
                .choose(&mut *rng)
                .copied()
                .unwrap_or("Clear sky")
                .to_string(),
            humidity: rng.gen_range(30..80),
            pressure: f64::from(rng.gen_range(1000_u16..1020)),
            wind_speed: f64::from(rng.gen_range(5_u16..25)),
            cloud_cover: rng.gen_range(0..100),
        }
    }
}

impl Default for DemoWeatherLookup {
    fn default() -> Self {
        Self::from_entropy()
    }
}

#[async_trait]
impl WeatherLookup for DemoWeatherLookup {
    async fn lookup(&self, city: &str, _key: &ApiKey) -> Result<Option<WeatherSnapshot>> {
        let snapshot = self.generate(city);
        tracing::debug!(city, temperature = snapshot.temperature, "Demo weather generated");
        Ok(Some(snapshot))
    }

    fn name(&self) -> &str {
        "Demo"
    }
}
