//! Retrieval-to-synthesis answering pipeline.
//!
//! Turns a natural-language question into a cited answer:
//! rank candidate sources, extract their text (PDF or markup), chunk the
//! combined text into word windows, summarize each chunk with an LLM, and
//! synthesize a final answer from the collected evidence.
//!
//! All data is transient: each query is processed independently and nothing
//! is persisted across runs.

pub mod chunker;
pub mod extract;
pub mod orchestrator;
pub mod retriever;
pub mod summarizer;
pub mod types;

// Re-export commonly used types
pub use extract::{ContentExtractor, HttpExtractor};
pub use orchestrator::{Pipeline, PipelineOptions};
pub use retriever::{DocumentRanker, HttpRanker, MAX_SOURCES};
pub use summarizer::Summarizer;
pub use types::{Brief, DocumentKind, ExtractedDocument, SourceReference, SourceReport};
