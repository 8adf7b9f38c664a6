//! Document retrieval over the external ranking service.
//!
//! The ranking service is a black box: it takes a query and returns an
//! ordered list of candidate URLs. Failures here are fatal for the run,
//! since without candidate sources there is nothing to answer from.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use webbrief_core::{AppError, AppResult};

use crate::types::SourceReference;

/// Hard cap on candidate sources per run, regardless of the requested
/// `top_k`.
pub const MAX_SOURCES: usize = 5;

/// Trait for document ranking backends.
#[async_trait::async_trait]
pub trait DocumentRanker: Send + Sync {
    /// Rank candidate documents for a query.
    ///
    /// Returns up to `top_k` URLs (capped at [`MAX_SOURCES`]), best first.
    /// Duplicates are not filtered. An unreachable or misbehaving service
    /// surfaces as `AppError::Retrieval`.
    async fn rank(&self, query: &str, top_k: u32) -> AppResult<Vec<SourceReference>>;
}

/// Ranking service request format.
#[derive(Debug, Serialize)]
struct RankRequest<'a> {
    query: &'a str,
    page_size: u32,
}

/// Ranking service response format.
#[derive(Debug, Deserialize)]
struct RankResponse {
    results: Vec<RankedHit>,
}

#[derive(Debug, Deserialize)]
struct RankedHit {
    url: String,
}

/// HTTP client for a JSON ranking service.
pub struct HttpRanker {
    /// Base URL for the ranking service
    base_url: String,

    /// HTTP client
    client: reqwest::Client,
}

impl HttpRanker {
    /// Create a ranker client with a per-request timeout.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Retrieval(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            base_url: base_url.into(),
            client,
        })
    }
}

#[async_trait::async_trait]
impl DocumentRanker for HttpRanker {
    async fn rank(&self, query: &str, top_k: u32) -> AppResult<Vec<SourceReference>> {
        tracing::info!("Ranking documents for query");
        tracing::debug!("Query: {}, top_k: {}", query, top_k);

        let request = RankRequest {
            query,
            page_size: top_k,
        };
        let url = format!("{}/v1/rank", self.base_url);

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| AppError::Retrieval(format!("Ranking service unreachable: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AppError::Retrieval(format!(
                "Ranking service error ({}): {}",
                status, error_text
            )));
        }

        let body: RankResponse = response
            .json()
            .await
            .map_err(|e| AppError::Retrieval(format!("Invalid ranking response: {}", e)))?;

        let sources = cap_sources(body.results.into_iter().map(|hit| hit.url));

        tracing::info!("Ranker returned {} candidate sources", sources.len());

        Ok(sources)
    }
}

/// Convert ranked URLs into source references, keeping rank order and
/// applying the [`MAX_SOURCES`] cap.
fn cap_sources(urls: impl IntoIterator<Item = String>) -> Vec<SourceReference> {
    urls.into_iter()
        .take(MAX_SOURCES)
        .map(SourceReference::new)
        .collect()
}
