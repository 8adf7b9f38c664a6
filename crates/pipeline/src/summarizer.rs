//! Per-chunk summarization via the text-completion boundary.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use webbrief_core::{AppError, AppResult};
use webbrief_llm::{LlmClient, LlmRequest};
use webbrief_prompt::{build_prompt, PromptDefinition};

/// Reduces one chunk to a short summary with a single completion call.
#[derive(Clone)]
pub struct Summarizer {
    client: Arc<dyn LlmClient>,
    model: String,
    prompt: PromptDefinition,
    timeout: Duration,
}

impl Summarizer {
    /// Create a summarizer over the given completion client.
    pub fn new(
        client: Arc<dyn LlmClient>,
        model: impl Into<String>,
        prompt: PromptDefinition,
        timeout: Duration,
    ) -> Self {
        Self {
            client,
            model: model.into(),
            prompt,
            timeout,
        }
    }

    /// Summarize one chunk.
    ///
    /// Embeds the chunk verbatim in the instructional prompt and returns
    /// the trimmed completion. Callers filter blank chunks upstream; a
    /// blank chunk here wastes a call but is not unsafe.
    pub async fn summarize(&self, chunk: &str) -> AppResult<String> {
        let mut variables = HashMap::new();
        variables.insert("chunk".to_string(), chunk.to_string());

        let prompt = build_prompt(&self.prompt, &variables)?;

        let request = LlmRequest::new(prompt, &self.model).with_temperature(0.2);

        let response = tokio::time::timeout(self.timeout, self.client.complete(&request))
            .await
            .map_err(|_| {
                AppError::Summarization(format!(
                    "Completion timed out after {}s",
                    self.timeout.as_secs()
                ))
            })?
            .map_err(|e| AppError::Summarization(format!("Completion failed: {}", e)))?;

        Ok(response.content.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use webbrief_llm::{LlmResponse, LlmUsage};
    use webbrief_prompt::{load_prompt, SUMMARIZE_CHUNK};

    struct EchoLlm;

    #[async_trait::async_trait]
    impl LlmClient for EchoLlm {
        fn provider_name(&self) -> &str {
            "echo"
        }

        async fn complete(&self, request: &LlmRequest) -> AppResult<LlmResponse> {
            Ok(LlmResponse {
                content: format!("  echo: {} bytes  ", request.prompt.len()),
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
            Err(AppError::Llm("service unavailable".to_string()))
        }
    }

    fn summarizer(client: Arc<dyn LlmClient>) -> Summarizer {
        let prompt = load_prompt(None, SUMMARIZE_CHUNK).unwrap();
        Summarizer::new(client, "llama3.2", prompt, Duration::from_secs(5))
    }

    #[tokio::test]
    async fn test_summarize_trims_response() {
        let summarizer = summarizer(Arc::new(EchoLlm));
        let summary = summarizer.summarize("some chunk text").await.unwrap();

        assert!(summary.starts_with("echo:"));
        assert!(!summary.starts_with(' '));
        assert!(!summary.ends_with(' '));
    }

    #[tokio::test]
    async fn test_completion_failure_maps_to_summarization_error() {
        let summarizer = summarizer(Arc::new(FailingLlm));
        let result = summarizer.summarize("some chunk text").await;

        assert!(matches!(result, Err(AppError::Summarization(_))));
    }
}
