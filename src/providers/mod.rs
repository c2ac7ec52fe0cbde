//! Text-generation providers.
//!
//! Provider failures are a closed set of kinds so callers branch on the
//! variant instead of inspecting message strings. The `Display` text of
//! each variant is the user-facing message.

pub mod claude;
pub mod ollama;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("{0}")]
    Connection(String),

    #[error("{0}")]
    Timeout(String),

    #[error("{0}")]
    Request(String),

    #[error("{0}")]
    MissingCredential(String),

    #[error("{0}")]
    Quota(String),
}

/// A blocking text-generation capability: prompt in, generated text out.
pub trait TextGenerator: Send + Sync {
    fn generate(&self, prompt: &str) -> Result<String, ProviderError>;
}
