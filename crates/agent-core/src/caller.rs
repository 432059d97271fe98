//! Caller Identity
//!
//! Identity of whoever an orchestration runs on behalf of. Resolved upstream
//! by the authentication layer; opaque to the core apart from its id.

use serde::{Deserialize, Serialize};

/// Fallback id when the authentication layer supplied none
pub const UNKNOWN_CALLER: &str = "unknown";

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CallerContext {
    /// Stable caller id (token subject)
    pub id: String,

    /// Display name, if known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl CallerContext {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Name to address the caller by
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("User")
    }

    /// `"Name (ID: id)"`, for system prompts
    pub fn label(&self) -> String {
        format!("{} (ID: {})", self.display_name(), self.id)
    }
}

impl Default for CallerContext {
    fn default() -> Self {
        Self::new(UNKNOWN_CALLER)
    }
}

impl std::fmt::Display for CallerContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id)
    }
}
