//! Demo Responder
//!
//! Offline stand-in for the model backend. Replies are canned templates
//! picked by an injectable random generator, so a seeded responder always
//! produces the same sequence of answers.

use std::sync::{Mutex, PoisonError};

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// Cities the demo weather path picks from
pub const DEMO_CITIES: [&str; 5] = ["London", "New York", "Tokyo", "Paris", "Sydney"];

const REPLY_TEMPLATES: [&str; 4] = [
    "Hello! You asked: '{message}'. This is a demo response.",
    "I understand you're asking about: '{message}'. In demo mode, I can provide general assistance.",
    "Thanks for your message: '{message}'. I'm running in demo mode - connect a real API key for full functionality.",
    "Your query '{message}' is interesting! This is a simulated response for testing.",
];

/// Canned reply generator
pub struct DemoResponder {
    rng: Mutex<StdRng>,
}

impl DemoResponder {
    /// Deterministic responder
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

    /// Pick one of the canned replies for `message`
    pub fn canned_reply(&self, message: &str) -> String {
        let template = self.choose(&REPLY_TEMPLATES);
        template.replace("{message}", message)
    }

    /// Pick a city for the demo weather path
    pub fn pick_city(&self) -> &'static str {
        self.choose(&DEMO_CITIES)
    }

    /// Whether the demo weather path applies to `message`
    pub fn mentions_weather(message: &str) -> bool {
        message.to_lowercase().contains("weather")
    }

    /// Combined answer for the demo weather path
    pub fn weather_reply(city: &str, summary: &str) -> String {
        format!("I see you're asking about weather! Here's the current weather for {city}: {summary} (Demo mode)")
    }

    fn choose(&self, options: &[&'static str]) -> &'static str {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        options.choose(&mut *rng).copied().unwrap_or_default()
    }
}

impl Default for DemoResponder {
    fn default() -> Self {
        Self::from_entropy()
    }
}

impl std::fmt::Debug for DemoResponder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DemoResponder").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_replies() {
        let a = DemoResponder::seeded(42);
        let b = DemoResponder::seeded(42);

        for _ in 0..8 {
            assert_eq!(a.canned_reply("hi"), b.canned_reply("hi"));
            assert_eq!(a.pick_city(), b.pick_city());
        }
    }

    #[test]
    fn test_reply_echoes_message() {
        let demo = DemoResponder::seeded(7);
        let reply = demo.canned_reply("how are you?");
        assert!(reply.contains("'how are you?'"));
        assert!(!reply.contains("{message}"));
    }

    #[test]
    fn test_city_from_list() {
        let demo = DemoResponder::seeded(1);
        for _ in 0..20 {
            assert!(DEMO_CITIES.contains(&demo.pick_city()));
        }
    }

    #[test]
    fn test_mentions_weather() {
        assert!(DemoResponder::mentions_weather("What's the WEATHER like?"));
        assert!(!DemoResponder::mentions_weather("Tell me a joke"));
    }
}
