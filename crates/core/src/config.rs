//! Configuration management for the webbrief CLI.
//!
//! This module handles loading and merging configuration from multiple
//! sources:
//! - Struct defaults
//! - Config file (webbrief.yaml, or `WEBBRIEF_CONFIG`)
//! - Environment variables
//! - Command-line flags
//!
//! Each layer overrides the one before it. All collaborators (ranker,
//! extractor, LLM client) are built from this config once at startup and
//! passed into the pipeline by reference; there is no ambient global state.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{AppError, AppResult};

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Optional config file path
    pub config_file: Option<PathBuf>,

    /// LLM provider (e.g., "ollama")
    pub provider: String,

    /// Model identifier for completions
    pub model: String,

    /// Optional custom endpoint for the LLM provider
    pub endpoint: Option<String>,

    /// API key for the LLM provider (resolved from the environment)
    pub api_key: Option<String>,

    /// Environment variable holding the API key
    pub api_key_env: Option<String>,

    /// Base URL of the document ranking service
    pub ranker_endpoint: String,

    /// Number of candidate sources to request from the ranker
    pub top_k: u32,

    /// Chunk window size in words
    pub chunk_size: usize,

    /// Overlap between consecutive chunks in words
    pub chunk_overlap: usize,

    /// Maximum concurrent extraction/summarization calls
    pub concurrency: usize,

    /// Timeout for each external call (HTTP fetch, completion), in seconds
    pub request_timeout_secs: u64,

    /// Optional directory with prompt template overrides
    pub prompt_dir: Option<PathBuf>,

    /// Log level override
    pub log_level: Option<String>,

    /// Verbose mode (enables debug logging)
    pub verbose: bool,

    /// Disable colored output
    pub no_color: bool,
}

/// Full configuration file structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ConfigFile {
    llm: Option<LlmSection>,
    ranker: Option<RankerSection>,
    pipeline: Option<PipelineSection>,
    prompts: Option<PromptsSection>,
    logging: Option<LoggingSection>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct LlmSection {
    provider: Option<String>,
    model: Option<String>,
    endpoint: Option<String>,
    #[serde(rename = "apiKeyEnv")]
    api_key_env: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct RankerSection {
    endpoint: Option<String>,
    #[serde(rename = "topK")]
    top_k: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct PipelineSection {
    #[serde(rename = "chunkSize")]
    chunk_size: Option<usize>,
    #[serde(rename = "chunkOverlap")]
    chunk_overlap: Option<usize>,
    concurrency: Option<usize>,
    #[serde(rename = "timeoutSecs")]
    timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct PromptsSection {
    dir: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct LoggingSection {
    level: Option<String>,
    color: Option<bool>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            config_file: None,
            provider: "ollama".to_string(), // Local-first default
            model: "llama3.2".to_string(),
            endpoint: None,
            api_key: None,
            api_key_env: None,
            ranker_endpoint: "http://localhost:8080".to_string(),
            top_k: 5,
            chunk_size: 1500,
            chunk_overlap: 300,
            concurrency: 4,
            request_timeout_secs: 30,
            prompt_dir: None,
            log_level: None,
            verbose: false,
            no_color: false,
        }
    }
}

impl AppConfig {
    /// Load configuration from the config file and environment variables.
    ///
    /// Environment variables:
    /// - `WEBBRIEF_CONFIG`: Path to config file (default: ./webbrief.yaml)
    /// - `WEBBRIEF_PROVIDER`: LLM provider
    /// - `WEBBRIEF_MODEL`: Model identifier
    /// - `WEBBRIEF_ENDPOINT`: LLM endpoint override
    /// - `WEBBRIEF_RANKER_ENDPOINT`: Ranking service endpoint
    /// - `WEBBRIEF_API_KEY`: API key
    /// - `RUST_LOG`: Log level
    /// - `NO_COLOR`: Disable colored output
    pub fn load() -> AppResult<Self> {
        let mut config = Self::default();

        if let Ok(config_file) = std::env::var("WEBBRIEF_CONFIG") {
            config.config_file = Some(PathBuf::from(config_file));
        }

        // Load from YAML config file if it exists
        let config_path = if let Some(ref cf) = config.config_file {
            cf.clone()
        } else {
            PathBuf::from("webbrief.yaml")
        };

        if config_path.exists() {
            tracing::debug!("Loading config file: {:?}", config_path);
            config = config.merge_yaml(&config_path)?;
        }

        // Environment variables override YAML config
        if let Ok(provider) = std::env::var("WEBBRIEF_PROVIDER") {
            config.provider = provider;
        }

        if let Ok(model) = std::env::var("WEBBRIEF_MODEL") {
            config.model = model;
        }

        if let Ok(endpoint) = std::env::var("WEBBRIEF_ENDPOINT") {
            config.endpoint = Some(endpoint);
        }

        if let Ok(ranker) = std::env::var("WEBBRIEF_RANKER_ENDPOINT") {
            config.ranker_endpoint = ranker;
        }

        config.api_key = std::env::var("WEBBRIEF_API_KEY").ok();
        config.log_level = std::env::var("RUST_LOG").ok();

        if std::env::var("NO_COLOR").is_ok() {
            config.no_color = true;
        }

        Ok(config)
    }

    /// Merge YAML configuration file into this config.
    fn merge_yaml(&mut self, path: &PathBuf) -> AppResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!("Failed to read config file {:?}: {}", path, e))
        })?;

        let config_file: ConfigFile = serde_yaml::from_str(&contents).map_err(|e| {
            AppError::Config(format!("Failed to parse config file {:?}: {}", path, e))
        })?;

        let mut result = self.clone();

        if let Some(llm) = config_file.llm {
            if let Some(provider) = llm.provider {
                result.provider = provider;
            }
            if let Some(model) = llm.model {
                result.model = model;
            }
            if llm.endpoint.is_some() {
                result.endpoint = llm.endpoint;
            }
            if llm.api_key_env.is_some() {
                result.api_key_env = llm.api_key_env;
            }
        }

        if let Some(ranker) = config_file.ranker {
            if let Some(endpoint) = ranker.endpoint {
                result.ranker_endpoint = endpoint;
            }
            if let Some(top_k) = ranker.top_k {
                result.top_k = top_k;
            }
        }

        if let Some(pipeline) = config_file.pipeline {
            if let Some(chunk_size) = pipeline.chunk_size {
                result.chunk_size = chunk_size;
            }
            if let Some(chunk_overlap) = pipeline.chunk_overlap {
                result.chunk_overlap = chunk_overlap;
            }
            if let Some(concurrency) = pipeline.concurrency {
                result.concurrency = concurrency;
            }
            if let Some(timeout_secs) = pipeline.timeout_secs {
                result.request_timeout_secs = timeout_secs;
            }
        }

        if let Some(prompts) = config_file.prompts {
            if let Some(dir) = prompts.dir {
                result.prompt_dir = Some(PathBuf::from(dir));
            }
        }

        if let Some(logging) = config_file.logging {
            if let Some(level) = logging.level {
                result.log_level = Some(level);
            }
            if let Some(color) = logging.color {
                result.no_color = !color;
            }
        }

        Ok(result)
    }

    /// Apply CLI overrides to the configuration.
    ///
    /// This method merges command-line flags with the loaded configuration,
    /// giving precedence to CLI flags over environment variables.
    #[allow(clippy::too_many_arguments)]
    pub fn with_overrides(
        mut self,
        config_file: Option<PathBuf>,
        provider: Option<String>,
        model: Option<String>,
        ranker_endpoint: Option<String>,
        log_level: Option<String>,
        verbose: bool,
        no_color: bool,
    ) -> Self {
        if let Some(config_file) = config_file {
            self.config_file = Some(config_file);
        }

        if let Some(provider) = provider {
            self.provider = provider;
        }

        if let Some(model) = model {
            self.model = model;
        }

        if let Some(ranker_endpoint) = ranker_endpoint {
            self.ranker_endpoint = ranker_endpoint;
        }

        if let Some(log_level) = log_level {
            self.log_level = Some(log_level);
        }

        if verbose {
            self.verbose = true;
            // Verbose mode implies debug logging
            if self.log_level.is_none() {
                self.log_level = Some("debug".to_string());
            }
        }

        if no_color {
            self.no_color = true;
        }

        self
    }

    /// Resolve the API key for the active provider.
    ///
    /// `WEBBRIEF_API_KEY` wins; otherwise the variable named by
    /// `llm.apiKeyEnv` in the config file is consulted.
    pub fn resolve_api_key(&self) -> Option<String> {
        if let Some(ref key) = self.api_key {
            return Some(key.clone());
        }

        if let Some(ref env_var) = self.api_key_env {
            if let Ok(key) = std::env::var(env_var) {
                return Some(key);
            }
        }

        None
    }

    /// Validate configuration for the active provider and pipeline settings.
    pub fn validate(&self) -> AppResult<()> {
        let provider = &self.provider;
        let known_providers = ["ollama", "openai", "claude"];

        if !known_providers.contains(&provider.as_str()) {
            return Err(AppError::Config(format!(
                "Unknown provider: {}. Supported: {}",
                provider,
                known_providers.join(", ")
            )));
        }

        if self.top_k == 0 {
            return Err(AppError::Config(
                "topK must be at least 1".to_string(),
            ));
        }

        if self.chunk_size <= self.chunk_overlap {
            return Err(AppError::Config(format!(
                "chunkSize ({}) must be greater than chunkOverlap ({})",
                self.chunk_size, self.chunk_overlap
            )));
        }

        if self.concurrency == 0 {
            return Err(AppError::Config(
                "concurrency must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}
