//! Command handlers for the webbrief CLI.
//!
//! This module organizes all CLI commands into separate submodules and
//! wires the pipeline collaborators from configuration.

pub mod ask;
pub mod extract;
pub mod sources;

// Re-export command types for convenience
pub use ask::AskCommand;
pub use extract::ExtractCommand;
pub use sources::SourcesCommand;

use std::sync::Arc;
use std::time::Duration;

use webbrief_core::{AppConfig, AppError, AppResult};
use webbrief_llm::create_client;
use webbrief_pipeline::{HttpExtractor, HttpRanker, Pipeline, PipelineOptions};
use webbrief_prompt::PromptSet;

/// Per-request timeout shared by every external call.
pub(crate) fn request_timeout(config: &AppConfig) -> Duration {
    Duration::from_secs(config.request_timeout_secs)
}

/// Build the full pipeline from configuration.
///
/// All collaborators are created here, once, and passed into the pipeline
/// by reference counting; commands hold no other state.
pub(crate) fn build_pipeline(config: &AppConfig) -> AppResult<Pipeline> {
    config.validate()?;

    let timeout = request_timeout(config);

    let ranker = Arc::new(HttpRanker::new(config.ranker_endpoint.as_str(), timeout)?);
    let extractor = Arc::new(HttpExtractor::new(timeout)?);

    let api_key = config.resolve_api_key();
    let llm = create_client(
        &config.provider,
        config.endpoint.as_deref(),
        api_key.as_deref(),
        Some(timeout),
    )
    .map_err(AppError::Config)?;

    let prompts = PromptSet::load(config.prompt_dir.as_deref())?;

    let options = PipelineOptions {
        model: config.model.clone(),
        top_k: config.top_k,
        chunk_size: config.chunk_size,
        chunk_overlap: config.chunk_overlap,
        concurrency: config.concurrency,
        completion_timeout: timeout,
    };

    Pipeline::new(ranker, extractor, llm, prompts, options)
}
