//! Credential Configuration
//!
//! Read-only snapshot of weather keys and caller entitlements.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{CredentialError, Result};
use crate::key::FREE_TIER_KEY;

/// Snapshot of every input the key policy needs
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyConfig {
    /// Key used when no other tier applies
    #[serde(default = "default_key")]
    pub default_key: String,

    /// Key shared by premium callers
    #[serde(default)]
    pub premium_key: Option<String>,

    /// Caller id → caller's own key
    #[serde(default)]
    pub user_keys: HashMap<String, String>,

    /// Caller ids flagged premium
    #[serde(default)]
    pub premium_users: HashSet<String>,

    /// Caller id → role
    #[serde(default)]
    pub user_roles: HashMap<String, String>,

    /// Role → key
    #[serde(default)]
    pub role_keys: HashMap<String, String>,
}

fn default_key() -> String {
    FREE_TIER_KEY.into()
}

impl Default for KeyConfig {
    fn default() -> Self {
        Self {
            default_key: default_key(),
            premium_key: None,
            user_keys: HashMap::new(),
            premium_users: HashSet::new(),
            user_roles: HashMap::new(),
            role_keys: HashMap::new(),
        }
    }
}

impl KeyConfig {
    /// Parse a JSON snapshot
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a JSON snapshot from disk
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    /// Build from environment variables.
    ///
    /// `WEATHER_KEYS_FILE` supplies the per-caller tables; `WEATHER_API_KEY` and
    /// `WEATHER_PREMIUM_API_KEY` override the file's default and premium keys.
    pub fn from_env() -> Result<Self> {
        let mut config = match std::env::var("WEATHER_KEYS_FILE") {
            Ok(path) if !path.trim().is_empty() => {
                tracing::info!(path = %path, "Loading weather key snapshot");
                Self::from_file(path)?
            }
            _ => Self::default(),
        };

        if let Ok(key) = std::env::var("WEATHER_API_KEY") {
            if !key.trim().is_empty() {
                config.default_key = key;
            }
        }

        if let Ok(key) = std::env::var("WEATHER_PREMIUM_API_KEY") {
            if !key.trim().is_empty() {
                config.premium_key = Some(key);
            }
        }

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.default_key.trim().is_empty() {
            return Err(CredentialError::Config(
                "default weather key must not be empty".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = KeyConfig::default();
        assert_eq!(config.default_key, "open-meteo");
        assert!(config.premium_key.is_none());
    }

    #[test]
    fn test_partial_json() {
        let config = KeyConfig::from_json_str(
            r#"{
                "premium_key": "premium-123",
                "premium_users": ["bob"],
                "user_roles": {"carol": "admin"},
                "role_keys": {"admin": "admin-123"}
            }"#,
        )
        .unwrap();

        assert_eq!(config.default_key, "open-meteo");
        assert!(config.premium_users.contains("bob"));
        assert_eq!(config.role_keys.get("admin").map(String::as_str), Some("admin-123"));
    }

    #[test]
    fn test_empty_default_rejected() {
        let result = KeyConfig::from_json_str(r#"{"default_key": " "}"#);
        assert!(matches!(result, Err(CredentialError::Config(_))));
    }

    #[test]
    fn test_invalid_json_rejected() {
        let result = KeyConfig::from_json_str("{not json");
        assert!(matches!(result, Err(CredentialError::Parse(_))));
    }
}
