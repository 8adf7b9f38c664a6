//! Prompt system for the webbrief CLI.
//!
//! This crate manages the two fixed instructional prompts of the answering
//! pipeline (per-chunk summarization and final synthesis):
//! - Built-in defaults, overridable with YAML files on disk
//! - Handlebars template rendering

pub mod builder;
pub mod loader;
pub mod types;

// Re-export main types
pub use builder::build_prompt;
pub use loader::{load_prompt, PromptSet, SUMMARIZE_CHUNK, SYNTHESIZE_ANSWER};
pub use types::PromptDefinition;
