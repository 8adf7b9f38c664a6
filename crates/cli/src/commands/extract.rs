//! Extract command handler.
//!
//! Runs only the extraction stage for a single URL and prints the text.

use clap::Args;
use webbrief_core::{AppConfig, AppResult};
use webbrief_pipeline::{ContentExtractor, HttpExtractor, SourceReference};

/// Extract the plain text of a single source URL
#[derive(Args, Debug)]
pub struct ExtractCommand {
    /// The URL to extract
    pub url: String,
}

impl ExtractCommand {
    /// Execute the extract command.
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing extract command");

        let timeout = super::request_timeout(config);
        let extractor = HttpExtractor::new(timeout)?;

        let source = SourceReference::new(&self.url);
        tracing::debug!("Extraction strategy: {:?}", source.kind());

        let document = extractor.extract(&source).await;

        if document.has_text() {
            println!("{}", document.text);
        } else {
            println!("(no text extracted)");
        }

        Ok(())
    }
}
