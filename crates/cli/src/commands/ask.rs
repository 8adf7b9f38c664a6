//! Ask command handler.
//!
//! Runs the full retrieval-to-synthesis pipeline for one question.

use clap::Args;
use std::path::PathBuf;
use webbrief_core::{AppConfig, AppResult};

/// Answer a question from ranked sources
#[derive(Args, Debug)]
pub struct AskCommand {
    /// The question to answer
    pub query: Option<String>,

    /// Read the question from a file
    #[arg(short, long)]
    pub file: Option<PathBuf>,

    /// Number of candidate sources to retrieve (capped at 5)
    #[arg(long)]
    pub top_k: Option<u32>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl AskCommand {
    /// Execute the ask command.
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing ask command");
        tracing::debug!("Ask command options: {:?}", self);

        // A blank question is a user warning, not an error.
        let query = match self.get_query() {
            Some(query) if !query.trim().is_empty() => query.trim().to_string(),
            _ => {
                tracing::warn!("No question provided");
                println!("Please enter a question.");
                return Ok(());
            }
        };

        let mut config = config.clone();
        if let Some(top_k) = self.top_k {
            config.top_k = top_k;
        }

        let pipeline = super::build_pipeline(&config)?;

        tracing::info!("Generating answer");
        let brief = pipeline.answer(&query).await?;

        if self.json {
            // Output as structured JSON with metadata
            let output = serde_json::json!({
                "answer": brief.answer,
                "sources": brief.sources,
                "provider": config.provider,
                "model": config.model,
            });

            let json = serde_json::to_string_pretty(&output)?;
            println!("{}", json);
        } else {
            // Output as plain text to stdout
            println!("{}", brief.answer);

            if !brief.sources.is_empty() {
                println!();
                println!("Sources:");
                for source in &brief.sources {
                    let marker = if source.extracted { "*" } else { "-" };
                    println!("  {} {}", marker, source.url);
                }
            }
        }

        Ok(())
    }

    /// Get the question text from various sources.
    fn get_query(&self) -> Option<String> {
        self.query.clone().or_else(|| {
            self.file.as_ref().and_then(|path| {
                std::fs::read_to_string(path)
                    .map_err(|e| tracing::error!("Failed to read question file: {}", e))
                    .ok()
            })
        })
    }
}
