//! Pipeline type definitions.
//!
//! Every entity here lives for a single pipeline run; nothing is persisted.

use serde::{Deserialize, Serialize};

/// A ranked candidate document, identified only by its URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceReference {
    /// Document URL, possibly pointing at a PDF or a markup page
    pub url: String,
}

impl SourceReference {
    /// Create a source reference from a URL string.
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }

    /// Which extraction strategy this source routes to.
    pub fn kind(&self) -> DocumentKind {
        DocumentKind::for_url(&self.url)
    }
}

/// Extraction strategy selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    /// Paginated binary document, extracted page-by-page
    Pdf,

    /// Markup document, extracted from visible text nodes
    Markup,
}

impl DocumentKind {
    /// Classify a URL by its path suffix.
    ///
    /// Only the URL path is inspected: `report.pdf?download=1` routes to
    /// the binary strategy, while a `pdf` appearing in a query parameter
    /// does not. Unparsable URLs fall back to a manual split on `?`/`#`.
    pub fn for_url(url: &str) -> Self {
        let path = match url::Url::parse(url) {
            Ok(parsed) => parsed.path().to_string(),
            Err(_) => url
                .split(['?', '#'])
                .next()
                .unwrap_or(url)
                .to_string(),
        };

        if path.to_ascii_lowercase().ends_with(".pdf") {
            DocumentKind::Pdf
        } else {
            DocumentKind::Markup
        }
    }
}

/// Plain text extracted from one source.
///
/// An unreadable source carries an empty text rather than an error; the
/// orchestrator decides what to do with the aggregate.
#[derive(Debug, Clone)]
pub struct ExtractedDocument {
    /// The source this text came from
    pub source: SourceReference,

    /// Extracted plain text; empty when extraction failed
    pub text: String,
}

impl ExtractedDocument {
    /// Create an extracted document.
    pub fn new(source: SourceReference, text: String) -> Self {
        Self { source, text }
    }

    /// An empty result for a source that could not be read.
    pub fn empty(source: SourceReference) -> Self {
        Self {
            source,
            text: String::new(),
        }
    }

    /// Whether this document contributed any usable text.
    pub fn has_text(&self) -> bool {
        !self.text.trim().is_empty()
    }
}

/// Per-source outcome shown to the caller.
#[derive(Debug, Clone, Serialize)]
pub struct SourceReport {
    /// Source URL
    pub url: String,

    /// Whether extraction yielded any text
    pub extracted: bool,
}

/// The final result of one pipeline run.
///
/// Contains the synthesized answer plus per-source reports. Internal
/// counters are kept for logging and tests, not serialized.
#[derive(Debug, Clone, Serialize)]
pub struct Brief {
    /// Answer text synthesized by the LLM
    pub answer: String,

    /// Sources considered for this answer, in rank order
    pub sources: Vec<SourceReport>,

    /// Internal: number of chunks produced from the combined text
    #[serde(skip_serializing)]
    pub chunks_total: usize,

    /// Internal: number of chunks successfully summarized
    #[serde(skip_serializing)]
    pub chunks_summarized: usize,
}

impl Brief {
    /// Create a brief from a synthesized answer.
    pub fn new(
        answer: String,
        sources: Vec<SourceReport>,
        chunks_total: usize,
        chunks_summarized: usize,
    ) -> Self {
        Self {
            answer,
            sources,
            chunks_total,
            chunks_summarized,
        }
    }

    /// Terminal state when the ranker returned no candidate sources.
    pub fn no_sources(query: &str) -> Self {
        Self {
            answer: format!("No sources found for \"{}\".", query),
            sources: Vec::new(),
            chunks_total: 0,
            chunks_summarized: 0,
        }
    }

    /// Terminal state when every retrieved source failed extraction.
    pub fn no_readable_sources(query: &str, sources: Vec<SourceReport>) -> Self {
        Self {
            answer: format!(
                "None of the retrieved sources for \"{}\" could be read.",
                query
            ),
            sources,
            chunks_total: 0,
            chunks_summarized: 0,
        }
    }

    /// Whether this brief carries a synthesized answer.
    pub fn is_answered(&self) -> bool {
        self.chunks_summarized > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pdf_suffix_routing() {
        assert_eq!(
            DocumentKind::for_url("https://irs.gov/b.pdf"),
            DocumentKind::Pdf
        );
        assert_eq!(
            DocumentKind::for_url("https://irs.gov/B.PDF"),
            DocumentKind::Pdf
        );
        assert_eq!(
            DocumentKind::for_url("https://irs.gov/a.html"),
            DocumentKind::Markup
        );
    }

    #[test]
    fn test_query_string_is_ignored() {
        // Suffix on the path wins; "pdf" elsewhere in the URL does not.
        assert_eq!(
            DocumentKind::for_url("https://irs.gov/report.pdf?download=1"),
            DocumentKind::Pdf
        );
        assert_eq!(
            DocumentKind::for_url("https://irs.gov/view?format=pdf"),
            DocumentKind::Markup
        );
        assert_eq!(
            DocumentKind::for_url("https://irs.gov/pdf-guides/index.html"),
            DocumentKind::Markup
        );
    }

    #[test]
    fn test_unparsable_url_falls_back() {
        assert_eq!(DocumentKind::for_url("not a url.pdf"), DocumentKind::Pdf);
        assert_eq!(DocumentKind::for_url("not a url"), DocumentKind::Markup);
    }

    #[test]
    fn test_extracted_document_has_text() {
        let source = SourceReference::new("https://irs.gov/a.html");
        assert!(!ExtractedDocument::empty(source.clone()).has_text());
        assert!(!ExtractedDocument::new(source.clone(), "   \n".to_string()).has_text());
        assert!(ExtractedDocument::new(source, "tax rates".to_string()).has_text());
    }

    #[test]
    fn test_no_sources_brief() {
        let brief = Brief::no_sources("capital gains");
        assert!(brief.answer.contains("capital gains"));
        assert!(brief.sources.is_empty());
        assert!(!brief.is_answered());
    }

    #[test]
    fn test_brief_serialization_hides_internals() {
        let brief = Brief::new(
            "answer".to_string(),
            vec![SourceReport {
                url: "https://irs.gov/a.html".to_string(),
                extracted: true,
            }],
            3,
            2,
        );

        let json = serde_json::to_value(&brief).unwrap();
        assert_eq!(json["answer"], "answer");
        assert!(json.get("chunks_total").is_none());
        assert!(json.get("chunks_summarized").is_none());
    }
}
