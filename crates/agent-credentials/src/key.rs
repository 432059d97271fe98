//! Keys and Decisions

use serde::{Deserialize, Serialize};

/// Marker for the free Open-Meteo tier, which needs no real key.
pub const FREE_TIER_KEY: &str = "open-meteo";

/// An upstream API key.
///
/// `Debug` and `Display` are redacted so keys never reach the logs.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Get the raw key (for building upstream requests only)
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Whether this is the keyless free-tier marker
    pub fn is_free_tier(&self) -> bool {
        self.0 == FREE_TIER_KEY
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl Default for ApiKey {
    fn default() -> Self {
        Self::new(FREE_TIER_KEY)
    }
}

impl std::fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ApiKey(***)")
    }
}

impl std::fmt::Display for ApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_free_tier() {
            write!(f, "{FREE_TIER_KEY}")
        } else {
            write!(f, "***")
        }
    }
}

/// Which tier of the policy produced a key.
///
/// Variant order is precedence order: `UserOverride` is checked first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum KeySource {
    UserOverride,
    Premium,
    RoleBased,
    Default,
}

impl KeySource {
    pub fn as_str(&self) -> &'static str {
        match self {
            KeySource::UserOverride => "user-override",
            KeySource::Premium => "premium",
            KeySource::RoleBased => "role-based",
            KeySource::Default => "default",
        }
    }
}

impl std::fmt::Display for KeySource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The outcome of resolving a caller's credential
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CredentialDecision {
    /// Key to present upstream
    #[serde(skip)]
    pub key: ApiKey,

    /// Tier that produced the key
    pub source: KeySource,
}

impl CredentialDecision {
    pub fn new(key: ApiKey, source: KeySource) -> Self {
        Self { key, source }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_is_redacted() {
        let key = ApiKey::new("sk-secret-123");
        assert_eq!(format!("{key:?}"), "ApiKey(***)");
        assert_eq!(key.to_string(), "***");
        assert_eq!(key.expose(), "sk-secret-123");
    }

    #[test]
    fn test_source_ordering_is_precedence() {
        let mut sources = vec![
            KeySource::Default,
            KeySource::RoleBased,
            KeySource::UserOverride,
            KeySource::Premium,
        ];
        sources.sort();
        assert_eq!(
            sources,
            vec![
                KeySource::UserOverride,
                KeySource::Premium,
                KeySource::RoleBased,
                KeySource::Default,
            ]
        );
    }

    #[test]
    fn test_decision_serializes_without_key() {
        let decision = CredentialDecision::new(ApiKey::new("premium-abc"), KeySource::Premium);
        let json = serde_json::to_value(&decision).unwrap();
        assert_eq!(json, serde_json::json!({"source": "premium"}));
    }
}
