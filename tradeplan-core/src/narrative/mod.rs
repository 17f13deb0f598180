//! Narrative generation: the hosted text-generation collaborator.

pub mod gemini;

pub use gemini::{GeminiClient, DEFAULT_GEMINI_BASE_URL, DEFAULT_GEMINI_MODEL};

use secrecy::SecretString;
use thiserror::Error;

/// Failures of a single generation call. None of them are retried.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("network error: {0}")]
    Network(String),

    #[error("API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    #[error("malformed response: {0}")]
    MalformedResponse(String),

    #[error("model returned no text ({0})")]
    EmptyResponse(String),
}

/// Trait for text generators.
///
/// The credential is passed per call so the generator holds no session state.
pub trait NarrativeGenerator {
    /// Human-readable name of this generator.
    fn name(&self) -> &str;

    /// Send one prompt and return the generated text.
    fn generate(&self, api_key: &SecretString, prompt: &str) -> Result<String, GenerationError>;
}
