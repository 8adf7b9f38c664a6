//! Sources command handler.
//!
//! Runs only the retrieval stage and prints the ranked candidate URLs.

use clap::Args;
use webbrief_core::{AppConfig, AppResult};
use webbrief_pipeline::{DocumentRanker, HttpRanker};

/// Show the ranked candidate sources for a query
#[derive(Args, Debug)]
pub struct SourcesCommand {
    /// The query to rank sources for
    pub query: String,

    /// Number of candidate sources to retrieve (capped at 5)
    #[arg(long)]
    pub top_k: Option<u32>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl SourcesCommand {
    /// Execute the sources command.
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing sources command");

        let timeout = super::request_timeout(config);
        let ranker = HttpRanker::new(config.ranker_endpoint.as_str(), timeout)?;

        let top_k = self.top_k.unwrap_or(config.top_k);
        let sources = ranker.rank(&self.query, top_k).await?;

        if self.json {
            let json = serde_json::to_string_pretty(&sources)?;
            println!("{}", json);
        } else if sources.is_empty() {
            println!("No sources found.");
        } else {
            for (rank, source) in sources.iter().enumerate() {
                println!("{}. {}", rank + 1, source.url);
            }
        }

        Ok(())
    }
}
