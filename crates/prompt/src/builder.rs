//! Prompt builder for rendering templates.

use std::collections::HashMap;

use handlebars::Handlebars;
use webbrief_core::{AppError, AppResult};

use crate::types::PromptDefinition;

/// Build a prompt from a definition and input variables.
///
/// Renders the definition's template using Handlebars with the provided
/// variables and returns the finished prompt text, ready for an LLM
/// completion call.
///
/// # Example
/// ```
/// use std::collections::HashMap;
/// use webbrief_prompt::{build_prompt, load_prompt, SUMMARIZE_CHUNK};
///
/// let def = load_prompt(None, SUMMARIZE_CHUNK).unwrap();
/// let mut vars = HashMap::new();
/// vars.insert("chunk".to_string(), "Capital gains are taxed at 15%.".to_string());
///
/// let prompt = build_prompt(&def, &vars).unwrap();
/// assert!(prompt.contains("Capital gains are taxed at 15%."));
/// ```
pub fn build_prompt(
    definition: &PromptDefinition,
    variables: &HashMap<String, String>,
) -> AppResult<String> {
    tracing::debug!("Building prompt: {}", definition.id);

    render_template(&definition.template, variables)
}

/// Render a Handlebars template with variables.
fn render_template(template: &str, variables: &HashMap<String, String>) -> AppResult<String> {
    let mut handlebars = Handlebars::new();

    // Disable HTML escaping for plain text
    handlebars.register_escape_fn(handlebars::no_escape);

    // Register template
    handlebars
        .register_template_string("prompt", template)
        .map_err(|e| AppError::Prompt(format!("Failed to register template: {}", e)))?;

    // Render
    let rendered = handlebars
        .render("prompt", &variables)
        .map_err(|e| AppError::Prompt(format!("Failed to render template: {}", e)))?;

    Ok(rendered)
}
