//! Key Selection Policy
//!
//! An ordered list of predicate→key rules evaluated top-down, ending in an
//! unconditional default. Rules are plain data, so the policy can be built and
//! tested without any configuration source.

use std::collections::{HashMap, HashSet};

use serde::Serialize;

use crate::config::KeyConfig;
use crate::key::{ApiKey, CredentialDecision, KeySource};

/// A single tier of the policy
#[derive(Clone, Debug)]
pub enum KeyRule {
    /// Caller has their own key
    UserOverride { keys: HashMap<String, ApiKey> },

    /// Caller is flagged premium and a premium key is configured
    Premium {
        members: HashSet<String>,
        key: Option<ApiKey>,
    },

    /// Caller has a role that maps to a key
    RoleBased {
        roles: HashMap<String, String>,
        keys: HashMap<String, ApiKey>,
    },
}

impl KeyRule {
    pub fn user_override<I, K>(keys: I) -> Self
    where
        I: IntoIterator<Item = (K, ApiKey)>,
        K: Into<String>,
    {
        KeyRule::UserOverride {
            keys: keys.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }

    pub fn premium<I, K>(members: I, key: Option<ApiKey>) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        KeyRule::Premium {
            members: members.into_iter().map(Into::into).collect(),
            key,
        }
    }

    pub fn role_based(roles: HashMap<String, String>, keys: HashMap<String, ApiKey>) -> Self {
        KeyRule::RoleBased { roles, keys }
    }

    /// Tier this rule belongs to
    pub fn source(&self) -> KeySource {
        match self {
            KeyRule::UserOverride { .. } => KeySource::UserOverride,
            KeyRule::Premium { .. } => KeySource::Premium,
            KeyRule::RoleBased { .. } => KeySource::RoleBased,
        }
    }

    /// Key this rule selects for the caller, if it applies
    pub fn select(&self, caller_id: &str) -> Option<&ApiKey> {
        let key = match self {
            KeyRule::UserOverride { keys } => keys.get(caller_id),
            KeyRule::Premium { members, key } => {
                if members.contains(caller_id) {
                    key.as_ref()
                } else {
                    None
                }
            }
            KeyRule::RoleBased { roles, keys } => {
                roles.get(caller_id).and_then(|role| keys.get(role))
            }
        };
        key.filter(|k| !k.is_empty())
    }
}

/// What the policy knows about a caller, for status reporting
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Entitlements {
    pub premium: bool,
    pub role: Option<String>,
}

/// Ordered credential policy with an unconditional default
#[derive(Clone, Debug)]
pub struct KeyPolicy {
    rules: Vec<KeyRule>,
    default: ApiKey,
}

impl Default for KeyPolicy {
    fn default() -> Self {
        Self::new(ApiKey::default())
    }
}

impl KeyPolicy {
    /// Policy with only the default tier
    pub fn new(default: ApiKey) -> Self {
        Self {
            rules: Vec::new(),
            default,
        }
    }

    /// Add a rule. Rules are kept in precedence order no matter the insertion order.
    pub fn with_rule(mut self, rule: KeyRule) -> Self {
        self.rules.push(rule);
        self.rules.sort_by_key(KeyRule::source);
        self
    }

    /// Build the fixed-order policy from a configuration snapshot
    pub fn from_config(config: &KeyConfig) -> Self {
        let premium_key = config
            .premium_key
            .clone()
            .map(ApiKey::new)
            .filter(|k| !k.is_empty());

        Self::new(ApiKey::new(config.default_key.clone()))
            .with_rule(KeyRule::user_override(
                config
                    .user_keys
                    .iter()
                    .map(|(user, key)| (user.clone(), ApiKey::new(key.clone()))),
            ))
            .with_rule(KeyRule::premium(config.premium_users.iter().cloned(), premium_key))
            .with_rule(KeyRule::role_based(
                config.user_roles.clone(),
                config
                    .role_keys
                    .iter()
                    .map(|(role, key)| (role.clone(), ApiKey::new(key.clone())))
                    .collect(),
            ))
    }

    /// Resolve the key for a caller. Always succeeds.
    pub fn resolve(&self, caller_id: &str) -> CredentialDecision {
        for rule in &self.rules {
            if let Some(key) = rule.select(caller_id) {
                tracing::debug!(caller = %caller_id, source = %rule.source(), "Resolved weather key");
                return CredentialDecision::new(key.clone(), rule.source());
            }
        }

        tracing::debug!(caller = %caller_id, source = %KeySource::Default, "Resolved weather key");
        CredentialDecision::new(self.default.clone(), KeySource::Default)
    }

    /// Premium flag and role for a caller
    pub fn entitlements(&self, caller_id: &str) -> Entitlements {
        let mut entitlements = Entitlements::default();
        for rule in &self.rules {
            match rule {
                KeyRule::UserOverride { .. } => {}
                KeyRule::Premium { members, .. } => {
                    entitlements.premium |= members.contains(caller_id);
                }
                KeyRule::RoleBased { roles, .. } => {
                    if entitlements.role.is_none() {
                        entitlements.role = roles.get(caller_id).cloned();
                    }
                }
            }
        }
        entitlements
    }

    /// Rules in evaluation order
    pub fn rules(&self) -> &[KeyRule] {
        &self.rules
    }
}
