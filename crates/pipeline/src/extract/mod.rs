//! Content extraction for candidate sources.
//!
//! Converts a URL into plain text, format-aware: URLs whose path ends in
//! `.pdf` go through the binary-document strategy, everything else through
//! the markup strategy.
//!
//! Failure semantics are deliberately soft: any network error, parse
//! error, or unexpected content is caught here, logged, and degraded to an
//! empty text. One broken source must never abort answering the whole
//! query.

pub mod html;
pub mod pdf;

use std::time::Duration;

use webbrief_core::{AppError, AppResult};

use crate::types::{DocumentKind, ExtractedDocument, SourceReference};

/// Browser request identity used for markup fetches. Plain library
/// user agents get blocked by basic bot filters on many document hosts.
pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

/// Trait for content extraction backends.
#[async_trait::async_trait]
pub trait ContentExtractor: Send + Sync {
    /// Extract plain text from one source.
    ///
    /// Infallible at this boundary: an unreadable source yields an
    /// [`ExtractedDocument`] with empty text.
    async fn extract(&self, source: &SourceReference) -> ExtractedDocument;
}

/// HTTP-backed extractor with PDF and markup strategies.
pub struct HttpExtractor {
    /// HTTP client
    client: reqwest::Client,
}

impl HttpExtractor {
    /// Create an extractor with a per-request timeout.
    pub fn new(timeout: Duration) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .user_agent(BROWSER_USER_AGENT)
            .redirect(reqwest::redirect::Policy::limited(5))
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Extraction(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client })
    }

    /// Fallible inner extraction; the public boundary converts errors to
    /// empty text.
    async fn try_extract(&self, source: &SourceReference) -> AppResult<String> {
        match source.kind() {
            DocumentKind::Pdf => {
                let bytes = self.fetch_bytes(&source.url).await?;
                pdf::extract_text(&bytes)
            }
            DocumentKind::Markup => {
                let body = self.fetch_text(&source.url).await?;
                Ok(html::visible_text(&body))
            }
        }
    }

    /// Fetch the full byte stream of a resource, buffered before parsing.
    async fn fetch_bytes(&self, url: &str) -> AppResult<Vec<u8>> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| AppError::Extraction(format!("Fetch failed: {}", e)))?
            .error_for_status()
            .map_err(|e| AppError::Extraction(format!("Fetch failed: {}", e)))?;

        let bytes = response
            .bytes()
            .await
            .map_err(|e| AppError::Extraction(format!("Failed to read body: {}", e)))?;

        Ok(bytes.to_vec())
    }

    /// Fetch a resource as text.
    async fn fetch_text(&self, url: &str) -> AppResult<String> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| AppError::Extraction(format!("Fetch failed: {}", e)))?
            .error_for_status()
            .map_err(|e| AppError::Extraction(format!("Fetch failed: {}", e)))?;

        response
            .text()
            .await
            .map_err(|e| AppError::Extraction(format!("Failed to read body: {}", e)))
    }
}

#[async_trait::async_trait]
impl ContentExtractor for HttpExtractor {
    async fn extract(&self, source: &SourceReference) -> ExtractedDocument {
        tracing::debug!("Extracting {:?} source: {}", source.kind(), source.url);

        match self.try_extract(source).await {
            Ok(text) => {
                tracing::debug!("Extracted {} bytes from {}", text.len(), source.url);
                ExtractedDocument::new(source.clone(), text)
            }
            Err(e) => {
                tracing::warn!("Failed to extract from {}: {}", source.url, e);
                ExtractedDocument::empty(source.clone())
            }
        }
    }
}
