//! Pipeline orchestration.
//!
//! Sequences one answering run: rank candidate sources, extract their
//! text, chunk, summarize each chunk, and synthesize the final answer.
//! A run is strictly sequential across stages; within the extraction and
//! summarization stages, independent items fan out over a bounded number
//! of concurrent tasks, reassembled in input order.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use tokio::sync::Semaphore;
use tokio_util::sync::CancellationToken;

use webbrief_core::{AppError, AppResult};
use webbrief_llm::{LlmClient, LlmRequest};
use webbrief_prompt::PromptSet;

use crate::chunker;
use crate::extract::ContentExtractor;
use crate::retriever::DocumentRanker;
use crate::summarizer::Summarizer;
use crate::types::{Brief, ExtractedDocument, SourceReference, SourceReport};

/// Tunable pipeline settings.
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    /// Model identifier for completions
    pub model: String,

    /// Number of candidate sources requested from the ranker
    pub top_k: u32,

    /// Chunk window size in words
    pub chunk_size: usize,

    /// Overlap between consecutive chunks in words
    pub chunk_overlap: usize,

    /// Maximum concurrent extraction/summarization tasks
    pub concurrency: usize,

    /// Timeout for each completion call
    pub completion_timeout: Duration,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            model: "llama3.2".to_string(),
            top_k: 5,
            chunk_size: chunker::DEFAULT_CHUNK_SIZE,
            chunk_overlap: chunker::DEFAULT_CHUNK_OVERLAP,
            concurrency: 4,
            completion_timeout: Duration::from_secs(60),
        }
    }
}

/// The retrieval-to-synthesis pipeline.
///
/// All collaborators are injected at construction; the pipeline itself
/// holds no mutable state, so runs are independent and repeatable.
pub struct Pipeline {
    ranker: Arc<dyn DocumentRanker>,
    extractor: Arc<dyn ContentExtractor>,
    llm: Arc<dyn LlmClient>,
    prompts: PromptSet,
    summarizer: Summarizer,
    options: PipelineOptions,
}

impl Pipeline {
    /// Create a pipeline over the given collaborators.
    pub fn new(
        ranker: Arc<dyn DocumentRanker>,
        extractor: Arc<dyn ContentExtractor>,
        llm: Arc<dyn LlmClient>,
        prompts: PromptSet,
        options: PipelineOptions,
    ) -> AppResult<Self> {
        if options.top_k == 0 {
            return Err(AppError::Config("top_k must be at least 1".to_string()));
        }

        if options.chunk_size <= options.chunk_overlap {
            return Err(AppError::Config(format!(
                "chunk size ({}) must be greater than overlap ({})",
                options.chunk_size, options.chunk_overlap
            )));
        }

        if options.concurrency == 0 {
            return Err(AppError::Config(
                "concurrency must be at least 1".to_string(),
            ));
        }

        let summarizer = Summarizer::new(
            Arc::clone(&llm),
            options.model.clone(),
            prompts.summarize.clone(),
            options.completion_timeout,
        );

        Ok(Self {
            ranker,
            extractor,
            llm,
            prompts,
            summarizer,
            options,
        })
    }

    /// Answer a query.
    pub async fn answer(&self, query: &str) -> AppResult<Brief> {
        self.answer_with_cancellation(query, &CancellationToken::new())
            .await
    }

    /// Answer a query, honoring a cancellation token.
    ///
    /// Once the token trips, no new extraction, summarization, or
    /// completion calls are issued and the run ends with
    /// `AppError::Cancelled`.
    pub async fn answer_with_cancellation(
        &self,
        query: &str,
        cancel: &CancellationToken,
    ) -> AppResult<Brief> {
        tracing::info!("Answering query: {}", query);

        // Stage 1: retrieve candidate sources.
        if cancel.is_cancelled() {
            return Err(AppError::Cancelled);
        }

        let sources = self.ranker.rank(query, self.options.top_k).await?;

        if sources.is_empty() {
            tracing::info!("Ranker returned no candidate sources");
            return Ok(Brief::no_sources(query));
        }

        tracing::info!("Retrieved {} candidate sources", sources.len());

        // Stage 2: extract all sources, in rank order.
        let documents = self.extract_all(&sources, cancel).await;

        if cancel.is_cancelled() {
            return Err(AppError::Cancelled);
        }

        let reports: Vec<SourceReport> = documents
            .iter()
            .map(|doc| SourceReport {
                url: doc.source.url.clone(),
                extracted: doc.has_text(),
            })
            .collect();

        let combined = documents
            .iter()
            .filter(|doc| doc.has_text())
            .map(|doc| doc.text.as_str())
            .collect::<Vec<_>>()
            .join("\n");

        if combined.trim().is_empty() {
            tracing::warn!("No source yielded any text");
            return Ok(Brief::no_readable_sources(query, reports));
        }

        // Stage 3: chunk the combined text.
        let chunks: Vec<String> = chunker::chunk_text(
            &combined,
            self.options.chunk_size,
            self.options.chunk_overlap,
        )?
        .collect();

        tracing::info!("Split combined text into {} chunks", chunks.len());

        // Stage 4: summarize each chunk, in chunk order.
        let summaries = self.summarize_all(&chunks, cancel).await;

        if cancel.is_cancelled() {
            return Err(AppError::Cancelled);
        }

        if summaries.is_empty() {
            return Err(AppError::Summarization(
                "Every chunk summary failed".to_string(),
            ));
        }

        tracing::info!("Summarized {}/{} chunks", summaries.len(), chunks.len());

        // Stage 5: assemble the evidence string.
        let evidence = summaries.join("\n\n");

        // Stage 6: synthesize the final answer.
        let answer = self.synthesize(query, &evidence, &sources).await?;

        Ok(Brief::new(answer, reports, chunks.len(), summaries.len()))
    }

    /// Extract every source concurrently, preserving rank order.
    ///
    /// Each task owns its input and produces its own output; failures are
    /// already degraded to empty text inside the extractor.
    async fn extract_all(
        &self,
        sources: &[SourceReference],
        cancel: &CancellationToken,
    ) -> Vec<ExtractedDocument> {
        let semaphore = Arc::new(Semaphore::new(self.options.concurrency));
        let mut handles = Vec::with_capacity(sources.len());

        for source in sources.iter().cloned() {
            let extractor = Arc::clone(&self.extractor);
            let semaphore = Arc::clone(&semaphore);
            let cancel = cancel.clone();

            handles.push(tokio::spawn(async move {
                let _permit = semaphore.acquire_owned().await.ok();
                if cancel.is_cancelled() {
                    return ExtractedDocument::empty(source);
                }
                extractor.extract(&source).await
            }));
        }

        let mut documents = Vec::with_capacity(sources.len());
        for (handle, source) in join_all(handles).await.into_iter().zip(sources) {
            match handle {
                Ok(document) => documents.push(document),
                Err(e) => {
                    tracing::warn!("Extraction task for {} failed: {}", source.url, e);
                    documents.push(ExtractedDocument::empty(source.clone()));
                }
            }
        }

        documents
    }

    /// Summarize every chunk concurrently, preserving chunk order.
    ///
    /// A failed chunk is logged and skipped; its summary is simply absent
    /// from the evidence.
    async fn summarize_all(&self, chunks: &[String], cancel: &CancellationToken) -> Vec<String> {
        let semaphore = Arc::new(Semaphore::new(self.options.concurrency));
        let mut handles = Vec::with_capacity(chunks.len());

        for (index, chunk) in chunks.iter().cloned().enumerate() {
            let summarizer = self.summarizer.clone();
            let semaphore = Arc::clone(&semaphore);
            let cancel = cancel.clone();

            handles.push(tokio::spawn(async move {
                let _permit = semaphore.acquire_owned().await.ok();
                if cancel.is_cancelled() {
                    return None;
                }
                match summarizer.summarize(&chunk).await {
                    Ok(summary) => Some(summary),
                    Err(e) => {
                        tracing::warn!("Skipping chunk {}: {}", index, e);
                        None
                    }
                }
            }));
        }

        join_all(handles)
            .await
            .into_iter()
            .filter_map(|handle| match handle {
                Ok(summary) => summary,
                Err(e) => {
                    tracing::warn!("Summarization task failed: {}", e);
                    None
                }
            })
            .collect()
    }

    /// Build the synthesis prompt and perform the final completion call.
    async fn synthesize(
        &self,
        query: &str,
        evidence: &str,
        sources: &[SourceReference],
    ) -> AppResult<String> {
        let source_list = sources
            .iter()
            .map(|source| format!("- {}", source.url))
            .collect::<Vec<_>>()
            .join("\n");

        let mut variables = HashMap::new();
        variables.insert("query".to_string(), query.to_string());
        variables.insert("evidence".to_string(), evidence.to_string());
        variables.insert("sources".to_string(), source_list);

        let prompt = webbrief_prompt::build_prompt(&self.prompts.synthesize, &variables)?;

        let request = LlmRequest::new(prompt, &self.options.model).with_temperature(0.3);

        let response = tokio::time::timeout(
            self.options.completion_timeout,
            self.llm.complete(&request),
        )
        .await
        .map_err(|_| {
            AppError::Synthesis(format!(
                "Completion timed out after {}s",
                self.options.completion_timeout.as_secs()
            ))
        })?
        .map_err(|e| AppError::Synthesis(format!("Completion failed: {}", e)))?;

        Ok(response.content.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use webbrief_llm::{LlmResponse, LlmUsage};

    struct StaticRanker {
        urls: Vec<String>,
        calls: AtomicUsize,
    }

    impl StaticRanker {
        fn new(urls: &[&str]) -> Self {
            Self {
                urls: urls.iter().map(|u| u.to_string()).collect(),
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait::async_trait]
    impl DocumentRanker for StaticRanker {
        async fn rank(&self, _query: &str, _top_k: u32) -> AppResult<Vec<SourceReference>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.urls.iter().map(SourceReference::new).collect())
        }
    }

    struct MapExtractor {
        texts: HashMap<String, String>,
        calls: AtomicUsize,
    }

    impl MapExtractor {
        fn new(entries: &[(&str, &str)]) -> Self {
            Self {
                texts: entries
                    .iter()
                    .map(|(url, text)| (url.to_string(), text.to_string()))
                    .collect(),
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait::async_trait]
    impl ContentExtractor for MapExtractor {
        async fn extract(&self, source: &SourceReference) -> ExtractedDocument {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let text = self.texts.get(&source.url).cloned().unwrap_or_default();
            ExtractedDocument::new(source.clone(), text)
        }
    }

    /// Deterministic completion mock. Summarize prompts get a summary
    /// derived from the chunk's trailing words; synthesis prompts (which
    /// contain "Question:") get a fixed answer. Records every prompt.
    struct ScriptedLlm {
        prompts: Mutex<Vec<String>>,
        calls: AtomicUsize,
        fail_marker: Option<&'static str>,
    }

    impl ScriptedLlm {
        fn new() -> Self {
            Self {
                prompts: Mutex::new(Vec::new()),
                calls: AtomicUsize::new(0),
                fail_marker: None,
            }
        }

        fn failing_on(marker: &'static str) -> Self {
            Self {
                fail_marker: Some(marker),
                ..Self::new()
            }
        }

        fn recorded_prompts(&self) -> Vec<String> {
            self.prompts.lock().unwrap().clone()
        }
    }

    #[async_trait::async_trait]
    impl LlmClient for ScriptedLlm {
        fn provider_name(&self) -> &str {
            "scripted"
        }

        async fn complete(&self, request: &LlmRequest) -> AppResult<LlmResponse> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.prompts.lock().unwrap().push(request.prompt.clone());

            if let Some(marker) = self.fail_marker {
                if request.prompt.contains(marker) {
                    return Err(AppError::Llm("scripted failure".to_string()));
                }
            }

            let content = if request.prompt.contains("Question:") {
                "The capital gains rate depends on income and holding period.".to_string()
            } else {
                let tail: Vec<&str> = request
                    .prompt
                    .split_whitespace()
                    .rev()
                    .take(3)
                    .collect();
                format!("summary({})", tail.join("_"))
            };

            Ok(LlmResponse {
                content,
                model: request.model.clone(),
                usage: LlmUsage::default(),
                done: true,
            })
        }
    }

    struct FailingLlm;

    #[async_trait::async_trait]
    impl LlmClient for FailingLlm {
        fn provider_name(&self) -> &str {
            "failing"
        }

        async fn complete(&self, _request: &LlmRequest) -> AppResult<LlmResponse> {
            Err(AppError::Llm("service down".to_string()))
        }
    }

    fn small_options() -> PipelineOptions {
        PipelineOptions {
            chunk_size: 5,
            chunk_overlap: 1,
            ..PipelineOptions::default()
        }
    }

    fn pipeline(
        ranker: Arc<StaticRanker>,
        extractor: Arc<MapExtractor>,
        llm: Arc<dyn LlmClient>,
    ) -> Pipeline {
        Pipeline::new(
            ranker,
            extractor,
            llm,
            PromptSet::default(),
            small_options(),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_empty_retrieval_short_circuits() {
        let ranker = Arc::new(StaticRanker::new(&[]));
        let extractor = Arc::new(MapExtractor::new(&[]));
        let llm = Arc::new(ScriptedLlm::new());

        let pipeline = pipeline(ranker.clone(), extractor.clone(), llm.clone());
        let brief = pipeline.answer("capital gains").await.unwrap();

        assert!(brief.answer.contains("No sources found"));
        assert_eq!(extractor.calls.load(Ordering::SeqCst), 0);
        assert_eq!(llm.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_fail_soft_with_one_broken_source() {
        let ranker = Arc::new(StaticRanker::new(&[
            "https://irs.gov/a.html",
            "https://irs.gov/broken.html",
        ]));
        // Only the first source yields text; the second degrades to "".
        let extractor = Arc::new(MapExtractor::new(&[(
            "https://irs.gov/a.html",
            "short term gains are taxed as ordinary income",
        )]));
        let llm = Arc::new(ScriptedLlm::new());

        let pipeline = pipeline(ranker, extractor, llm);
        let brief = pipeline
            .answer("What is the capital gains tax rate?")
            .await
            .unwrap();

        assert!(brief.is_answered());
        assert!(!brief.answer.is_empty());
        assert_eq!(brief.sources.len(), 2);
        assert!(brief.sources[0].extracted);
        assert!(!brief.sources[1].extracted);
    }

    #[tokio::test]
    async fn test_all_sources_unreadable() {
        let ranker = Arc::new(StaticRanker::new(&["https://irs.gov/a.html"]));
        let extractor = Arc::new(MapExtractor::new(&[]));
        let llm = Arc::new(ScriptedLlm::new());

        let pipeline = pipeline(ranker, extractor, llm.clone());
        let brief = pipeline.answer("capital gains").await.unwrap();

        assert!(brief.answer.contains("could be read"));
        assert!(!brief.is_answered());
        assert_eq!(llm.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_runs_are_idempotent() {
        let ranker = Arc::new(StaticRanker::new(&["https://irs.gov/a.html"]));
        let extractor = Arc::new(MapExtractor::new(&[(
            "https://irs.gov/a.html",
            "one two three four five six seven eight nine ten",
        )]));
        let llm = Arc::new(ScriptedLlm::new());

        let pipeline = pipeline(ranker, extractor, llm);
        let first = pipeline.answer("capital gains").await.unwrap();
        let second = pipeline.answer("capital gains").await.unwrap();

        assert_eq!(first.answer, second.answer);
        assert_eq!(first.chunks_total, second.chunks_total);
        assert_eq!(first.chunks_summarized, second.chunks_summarized);
    }

    #[tokio::test]
    async fn test_synthesis_prompt_contains_summaries_and_query() {
        let ranker = Arc::new(StaticRanker::new(&[
            "https://irs.gov/a.html",
            "https://irs.gov/b.pdf",
        ]));
        // Two short texts; with a 5-word window and 1-word overlap the
        // combined text yields two chunks, hence two summaries.
        let extractor = Arc::new(MapExtractor::new(&[
            ("https://irs.gov/a.html", "alpha beta gamma delta"),
            ("https://irs.gov/b.pdf", "epsilon zeta eta theta"),
        ]));
        let llm = Arc::new(ScriptedLlm::new());

        let pipeline = pipeline(ranker, extractor, llm.clone());
        let query = "What is the capital gains tax rate?";
        let brief = pipeline.answer(query).await.unwrap();

        assert!(!brief.answer.is_empty());
        assert_eq!(brief.chunks_total, 2);
        assert_eq!(brief.chunks_summarized, 2);

        let prompts = llm.recorded_prompts();
        assert_eq!(prompts.len(), 3); // two chunk summaries + synthesis

        let synthesis = prompts.last().unwrap();
        assert!(synthesis.contains(query));
        assert!(synthesis.contains("summary("));
        // Evidence holds both summaries, double-newline separated.
        let evidence_summaries = synthesis.matches("summary(").count();
        assert_eq!(evidence_summaries, 2);
        // The source list is included for citation.
        assert!(synthesis.contains("https://irs.gov/a.html"));
        assert!(synthesis.contains("https://irs.gov/b.pdf"));
    }

    #[tokio::test]
    async fn test_failed_chunk_is_skipped() {
        let ranker = Arc::new(StaticRanker::new(&["https://irs.gov/a.html"]));
        // Word 6 ("FAILME") lands in the second chunk only
        // (window starts at words 0 and 4).
        let extractor = Arc::new(MapExtractor::new(&[(
            "https://irs.gov/a.html",
            "one two three four five six FAILME eight",
        )]));
        let llm = Arc::new(ScriptedLlm::failing_on("FAILME"));

        let pipeline = pipeline(ranker, extractor, llm);
        let brief = pipeline.answer("capital gains").await.unwrap();

        assert!(brief.is_answered());
        assert_eq!(brief.chunks_total, 2);
        assert_eq!(brief.chunks_summarized, 1);
    }

    #[tokio::test]
    async fn test_all_summaries_failing_is_fatal() {
        let ranker = Arc::new(StaticRanker::new(&["https://irs.gov/a.html"]));
        let extractor = Arc::new(MapExtractor::new(&[(
            "https://irs.gov/a.html",
            "one two three four five",
        )]));
        let llm = Arc::new(FailingLlm);

        let pipeline = pipeline(ranker, extractor, llm);
        let result = pipeline.answer("capital gains").await;

        assert!(matches!(result, Err(AppError::Summarization(_))));
    }

    #[tokio::test]
    async fn test_cancellation_before_start() {
        let ranker = Arc::new(StaticRanker::new(&["https://irs.gov/a.html"]));
        let extractor = Arc::new(MapExtractor::new(&[]));
        let llm = Arc::new(ScriptedLlm::new());

        let pipeline = pipeline(ranker.clone(), extractor, llm);
        let cancel = CancellationToken::new();
        cancel.cancel();

        let result = pipeline
            .answer_with_cancellation("capital gains", &cancel)
            .await;

        assert!(matches!(result, Err(AppError::Cancelled)));
        assert_eq!(ranker.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_invalid_options_are_rejected() {
        let ranker = Arc::new(StaticRanker::new(&[]));
        let extractor = Arc::new(MapExtractor::new(&[]));
        let llm: Arc<dyn LlmClient> = Arc::new(ScriptedLlm::new());

        let result = Pipeline::new(
            ranker,
            extractor,
            llm,
            PromptSet::default(),
            PipelineOptions {
                chunk_size: 100,
                chunk_overlap: 100,
                ..PipelineOptions::default()
            },
        );

        assert!(result.is_err());
    }
}
