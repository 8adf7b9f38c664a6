//! Error types for the webbrief CLI.
//!
//! This module defines a unified error enum covering the pipeline failure
//! taxonomy (retrieval, extraction, summarization, synthesis) together with
//! the ambient categories (configuration, I/O, LLM transport, prompts,
//! serialization).

use thiserror::Error;

/// Unified error type for the webbrief CLI.
///
/// All fallible functions in the application return `Result<T, AppError>`.
/// We never panic; errors must be represented and propagated.
///
/// Propagation policy: errors from per-item work (extracting one source,
/// summarizing one chunk) are recovered at the item boundary and never abort
/// a run. Errors from whole-run steps (retrieval, final synthesis) always
/// surface to the caller.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O and filesystem errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Ranking service unreachable or returned an invalid response.
    /// Fatal for the run: no candidate sources means no answer.
    #[error("Retrieval error: {0}")]
    Retrieval(String),

    /// Network or parse failure for a single source. Recovered inside the
    /// extractor, which degrades the source to an empty text.
    #[error("Extraction error: {0}")]
    Extraction(String),

    /// Completion failure for a single chunk. The orchestrator skips the
    /// chunk; only a run where every chunk fails surfaces this variant.
    #[error("Summarization error: {0}")]
    Summarization(String),

    /// Completion failure for the final synthesis call. Fatal for the run.
    #[error("Synthesis error: {0}")]
    Synthesis(String),

    /// LLM provider transport errors
    #[error("LLM error: {0}")]
    Llm(String),

    /// Prompt system errors
    #[error("Prompt error: {0}")]
    Prompt(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// The caller cancelled the run before it completed.
    #[error("run cancelled")]
    Cancelled,

    /// Generic errors
    #[error("{0}")]
    Other(String),
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

impl From<serde_yaml::Error> for AppError {
    fn from(err: serde_yaml::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

/// Convenience type alias for Results with AppError.
pub type AppResult<T> = Result<T, AppError>;
