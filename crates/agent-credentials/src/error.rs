//! Credential Error Types

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, CredentialError>;

/// Errors raised while loading the credential snapshot.
///
/// Resolution itself never fails; only building the configuration can.
#[derive(Error, Debug)]
pub enum CredentialError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Credential file could not be read
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Credential file is not valid JSON
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

impl CredentialError {
    /// Get user-friendly message
    pub fn user_message(&self) -> &str {
        match self {
            CredentialError::Config(_) => "Service configuration error.",
            CredentialError::Io(_) | CredentialError::Parse(_) => {
                "The credential configuration could not be loaded."
            }
        }
    }
}
