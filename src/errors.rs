/*!
 * Error types for the newsbridge pipeline.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions. The pipeline itself
 * never returns these across its boundary: they travel inside
 * `PipelineOutcome::Failed` so callers can see why a document has no rendering.
 */

use std::fmt;

use thiserror::Error;

/// Errors that can occur when talking to the inference service
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Error when making an API request fails
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// Error when parsing an API response fails
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// Error returned by the API itself
    #[error("API responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message from the API
        message: String,
    },

    /// Error establishing or maintaining a connection
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Error related to rate limiting
    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    /// Error with authentication
    #[error("Authentication error: {0}")]
    AuthenticationError(String),
}

/// The two passes a document goes through
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Source language to target language
    Translate,
    /// Restructuring of the already translated text
    Format,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Translate => write!(f, "translate"),
            Stage::Format => write!(f, "format"),
        }
    }
}

/// Reasons a translation produced no text
#[derive(Error, Debug)]
pub enum TranslationError {
    /// Translation is switched off in the configuration
    #[error("Translation is disabled")]
    Disabled,

    /// Nothing to translate
    #[error("Input text is empty")]
    EmptyInput,

    /// A chunk exhausted its retries or came back empty
    #[error("Chunk {index}/{total} failed during {stage} stage")]
    ChunkFailed {
        /// Stage the chunk belonged to
        stage: Stage,
        /// 1-based chunk position
        index: usize,
        /// Number of chunks in the stage
        total: usize,
    },

    /// A configured commentary pattern does not compile
    #[error("Invalid commentary pattern: {0}")]
    InvalidPattern(String),
}

impl From<regex::Error> for TranslationError {
    fn from(error: regex::Error) -> Self {
        Self::InvalidPattern(error.to_string())
    }
}
