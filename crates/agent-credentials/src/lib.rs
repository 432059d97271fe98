//! # agent-credentials
//!
//! Chooses which upstream weather API key to present on behalf of a caller.
//!
//! ## Precedence
//!
//! ```text
//! ┌──────────────────┐   ┌──────────┐   ┌────────────┐   ┌─────────┐
//! │  user-override   │──▶│ premium  │──▶│ role-based │──▶│ default │
//! │ (per-caller key) │   │  (flag)  │   │ (role map) │   │ (always)│
//! └──────────────────┘   └──────────┘   └────────────┘   └─────────┘
//! ```
//!
//! The first rule that yields a key wins. The default tier is unconditional,
//! so resolution always produces exactly one [`CredentialDecision`].
//!
//! ## Usage
//!
//! ```rust,ignore
//! use agent_credentials::{KeyConfig, KeyPolicy};
//!
//! let policy = KeyPolicy::from_config(&KeyConfig::from_env()?);
//! let decision = policy.resolve("user-42");
//! tracing::info!(source = %decision.source, "resolved weather key");
//! ```

mod config;
mod error;
mod key;
mod policy;

pub use config::KeyConfig;
pub use error::{CredentialError, Result};
pub use key::{ApiKey, CredentialDecision, KeySource, FREE_TIER_KEY};
pub use policy::{Entitlements, KeyPolicy, KeyRule};
