//! Prompt loader with built-in defaults and YAML overrides.
//!
//! The pipeline uses exactly two prompts. Both ship as built-in templates
//! and can be replaced by dropping `<id>.yml` files into the configured
//! prompt directory.

use std::path::Path;

use webbrief_core::{AppError, AppResult};

use crate::types::PromptDefinition;

/// Prompt id for per-chunk summarization.
pub const SUMMARIZE_CHUNK: &str = "summarize.chunk";

/// Prompt id for final answer synthesis.
pub const SYNTHESIZE_ANSWER: &str = "synthesize.answer";

const SUMMARIZE_TEMPLATE: &str = "\
You are a research assistant. Summarize the key facts in the following \
passage, keeping figures, dates, and rates exact:

{{chunk}}";

const SYNTHESIZE_TEMPLATE: &str = "\
Answer the user's question in a clear and informative way based only on \
the evidence below, and cite the source links where helpful.

Question:
{{query}}

Evidence:
{{evidence}}

Sources:
{{sources}}";

/// The two prompt definitions used by one pipeline run.
#[derive(Debug, Clone)]
pub struct PromptSet {
    /// Per-chunk summarization prompt
    pub summarize: PromptDefinition,

    /// Final synthesis prompt
    pub synthesize: PromptDefinition,
}

impl PromptSet {
    /// Load both pipeline prompts, applying overrides from `override_dir`
    /// when present.
    pub fn load(override_dir: Option<&Path>) -> AppResult<Self> {
        Ok(Self {
            summarize: load_prompt(override_dir, SUMMARIZE_CHUNK)?,
            synthesize: load_prompt(override_dir, SYNTHESIZE_ANSWER)?,
        })
    }
}

impl Default for PromptSet {
    fn default() -> Self {
        Self {
            summarize: PromptDefinition::new(SUMMARIZE_CHUNK, "Summarize chunk", SUMMARIZE_TEMPLATE),
            synthesize: PromptDefinition::new(
                SYNTHESIZE_ANSWER,
                "Synthesize answer",
                SYNTHESIZE_TEMPLATE,
            ),
        }
    }
}

/// Load a prompt definition by id.
///
/// Searches `override_dir` for `<id>.yml` first; falls back to the
/// built-in definition.
///
/// # Example
/// ```
/// use webbrief_prompt::{load_prompt, SUMMARIZE_CHUNK};
///
/// let prompt = load_prompt(None, SUMMARIZE_CHUNK).unwrap();
/// assert!(prompt.template.contains("{{chunk}}"));
/// ```
pub fn load_prompt(override_dir: Option<&Path>, prompt_id: &str) -> AppResult<PromptDefinition> {
    if let Some(dir) = override_dir {
        let prompt_file = dir.join(format!("{}.yml", prompt_id));

        if prompt_file.exists() {
            tracing::debug!("Loading prompt override from: {:?}", prompt_file);

            let contents = std::fs::read_to_string(&prompt_file).map_err(|e| {
                AppError::Prompt(format!(
                    "Failed to read prompt file {:?}: {}",
                    prompt_file, e
                ))
            })?;

            let definition: PromptDefinition = serde_yaml::from_str(&contents).map_err(|e| {
                AppError::Prompt(format!(
                    "Failed to parse prompt YAML {:?}: {}",
                    prompt_file, e
                ))
            })?;

            validate_prompt(&definition)?;

            tracing::info!("Loaded prompt override: {} ({})", definition.id, definition.title);
            return Ok(definition);
        }
    }

    builtin(prompt_id)
        .ok_or_else(|| AppError::Prompt(format!("Unknown prompt id: {}", prompt_id)))
}

/// Built-in prompt definitions.
fn builtin(prompt_id: &str) -> Option<PromptDefinition> {
    match prompt_id {
        SUMMARIZE_CHUNK => Some(PromptDefinition::new(
            SUMMARIZE_CHUNK,
            "Summarize chunk",
            SUMMARIZE_TEMPLATE,
        )),
        SYNTHESIZE_ANSWER => Some(PromptDefinition::new(
            SYNTHESIZE_ANSWER,
            "Synthesize answer",
            SYNTHESIZE_TEMPLATE,
        )),
        _ => None,
    }
}

/// Validate a prompt definition.
fn validate_prompt(def: &PromptDefinition) -> AppResult<()> {
    if def.id.is_empty() {
        return Err(AppError::Prompt("Prompt ID cannot be empty".to_string()));
    }

    if def.template.is_empty() {
        return Err(AppError::Prompt(
            "Prompt template cannot be empty".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_load_builtin_prompts() {
        let summarize = load_prompt(None, SUMMARIZE_CHUNK).unwrap();
        assert!(summarize.template.contains("{{chunk}}"));

        let synthesize = load_prompt(None, SYNTHESIZE_ANSWER).unwrap();
        assert!(synthesize.template.contains("{{query}}"));
        assert!(synthesize.template.contains("{{evidence}}"));
        assert!(synthesize.template.contains("{{sources}}"));
    }

    #[test]
    fn test_load_unknown_prompt() {
        let result = load_prompt(None, "nonexistent");
        assert!(result.is_err());
    }

    #[test]
    fn test_override_wins_over_builtin() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join(format!("{}.yml", SUMMARIZE_CHUNK));
        fs::write(
            &file_path,
            r#"
id: summarize.chunk
title: "Custom summarize"
template: "Condense this: {{chunk}}"
"#,
        )
        .unwrap();

        let prompt = load_prompt(Some(temp_dir.path()), SUMMARIZE_CHUNK).unwrap();
        assert_eq!(prompt.title, "Custom summarize");
        assert!(prompt.template.starts_with("Condense"));
    }

    #[test]
    fn test_invalid_override_is_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join(format!("{}.yml", SUMMARIZE_CHUNK));
        fs::write(&file_path, "invalid: yaml: content:").unwrap();

        let result = load_prompt(Some(temp_dir.path()), SUMMARIZE_CHUNK);
        assert!(result.is_err());
    }

    #[test]
    fn test_prompt_set_load() {
        let set = PromptSet::load(None).unwrap();
        assert_eq!(set.summarize.id, SUMMARIZE_CHUNK);
        assert_eq!(set.synthesize.id, SYNTHESIZE_ANSWER);
    }
}
